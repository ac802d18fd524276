use std::fmt;

use tracing::debug;

use crate::error::{Result, WeatherError};

/// Maximum number of favorite cities.
pub const CAPACITY: usize = 3;

/// Ordered, capacity-bounded list of favorite city names.
///
/// Lives for one session only. Indices in the public API are 1-based, the
/// way they are shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesStore {
    cities: Vec<String>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.cities.len() >= CAPACITY
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Appends `city` and returns the new number of favorites.
    pub fn add(&mut self, city: &str) -> Result<usize> {
        if self.is_full() {
            return Err(WeatherError::FavoritesFull { capacity: CAPACITY });
        }
        let city = normalize(city)?;

        debug!(%city, "adding favorite");
        self.cities.push(city);
        Ok(self.cities.len())
    }

    /// Favorites paired with their 1-based positions.
    pub fn list(&self) -> impl Iterator<Item = (usize, &str)> {
        self.cities.iter().enumerate().map(|(i, c)| (i + 1, c.as_str()))
    }

    /// Replaces the city at 1-based `index`, returning the previous name.
    pub fn update(&mut self, index: usize, new_name: &str) -> Result<String> {
        let slot = self.slot(index)?;
        let new_name = normalize(new_name)?;

        debug!(index, %new_name, "updating favorite");
        Ok(std::mem::replace(&mut self.cities[slot], new_name))
    }

    /// Removes the city at 1-based `index` and returns it.
    pub fn remove(&mut self, index: usize) -> Result<String> {
        let slot = self.slot(index)?;

        debug!(index, "removing favorite");
        Ok(self.cities.remove(slot))
    }

    /// Validates a 1-based index and returns the matching 0-based slot.
    pub fn slot(&self, index: usize) -> Result<usize> {
        if (1..=self.cities.len()).contains(&index) {
            Ok(index - 1)
        } else {
            Err(WeatherError::InvalidIndex { index, len: self.cities.len() })
        }
    }
}

impl fmt::Display for FavoritesStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, (index, city)) in self.list().enumerate() {
            if n > 0 {
                writeln!(f)?;
            }
            write!(f, "{index}: {city}")?;
        }
        Ok(())
    }
}

fn normalize(city: &str) -> Result<String> {
    let city = city.trim();
    if city.is_empty() {
        return Err(WeatherError::EmptyCityName);
    }
    Ok(city.to_string())
}
