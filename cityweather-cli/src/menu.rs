//! The interactive text menu.
//!
//! Reads one choice per line from any `BufRead` and writes to any `Write`, so
//! a whole session can be replayed from a string in tests. End of input ends
//! the session the same way option 5 does.

use std::io::{self, BufRead, Write};

use cityweather_core::{
    ErrorKind, FavoritesStore, ResponseParser, WeatherError, WeatherProvider, favorites::CAPACITY,
    lookup,
};
use tracing::{debug, warn};

const MENU: &str = "\n1: Search weather by city\n\
                    2: Add city to favorites\n\
                    3: List favorite cities\n\
                    4: Update favorites\n\
                    5: Exit\n\
                    Choose an option: ";

pub struct Session<R, W> {
    provider: Box<dyn WeatherProvider>,
    parser: ResponseParser,
    favorites: FavoritesStore,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        provider: Box<dyn WeatherProvider>,
        parser: ResponseParser,
        input: R,
        output: W,
    ) -> Self {
        Self {
            provider,
            parser,
            favorites: FavoritesStore::new(),
            input,
            output,
        }
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub async fn run(&mut self) -> io::Result<()> {
        loop {
            let Some(choice) = self.prompt(MENU)? else {
                debug!("input closed");
                break;
            };

            match choice.as_str() {
                "1" => self.search().await?,
                "2" => self.add()?,
                "3" => self.list()?,
                "4" => self.update()?,
                "5" => break,
                other => {
                    debug!(choice = other, "invalid menu choice");
                    writeln!(self.output, "{}", WeatherError::invalid_choice(other))?;
                }
            }
        }

        writeln!(self.output, "Goodbye!")?;
        self.output.flush()
    }

    async fn search(&mut self) -> io::Result<()> {
        let Some(city) = self.prompt("Enter city: ")? else {
            return Ok(());
        };

        match lookup(self.provider.as_ref(), self.parser, &city).await {
            Ok(reading) => writeln!(self.output, "{reading}"),
            Err(e) => {
                if e.kind() == ErrorKind::Transport {
                    warn!(error = ?e, %city, "weather lookup failed");
                }
                writeln!(self.output, "{e}")
            }
        }
    }

    fn add(&mut self) -> io::Result<()> {
        let Some(city) = self.prompt("Enter city to add: ")? else {
            return Ok(());
        };

        match self.favorites.add(&city) {
            Ok(count) => writeln!(
                self.output,
                "{} added! ({count} of {CAPACITY} favorites)",
                self.favorites.cities()[count - 1]
            ),
            Err(e) => writeln!(self.output, "{e}"),
        }
    }

    fn list(&mut self) -> io::Result<()> {
        if self.favorites.is_empty() {
            writeln!(self.output, "No favorites yet.")
        } else {
            writeln!(self.output, "{}", self.favorites)
        }
    }

    fn update(&mut self) -> io::Result<()> {
        if self.favorites.is_empty() {
            return writeln!(self.output, "No favorites to update.");
        }

        writeln!(self.output, "{}", self.favorites)?;
        let Some(answer) = self.prompt("Enter number to update/remove: ")? else {
            return Ok(());
        };

        // Validate the number before asking what to do with it.
        let Ok(index) = answer.parse::<usize>() else {
            return writeln!(self.output, "{}", WeatherError::invalid_choice(answer));
        };
        if let Err(e) = self.favorites.slot(index) {
            return writeln!(self.output, "{e}");
        }

        let Some(action) = self.prompt("1: Update\n2: Remove\nChoose: ")? else {
            return Ok(());
        };

        match action.as_str() {
            "1" => {
                let Some(new_name) = self.prompt("Enter new city name: ")? else {
                    return Ok(());
                };
                match self.favorites.update(index, &new_name) {
                    Ok(_) => writeln!(self.output, "Updated!"),
                    Err(e) => writeln!(self.output, "{e}"),
                }
            }
            "2" => match self.favorites.remove(index) {
                Ok(_) => writeln!(self.output, "Removed!"),
                Err(e) => writeln!(self.output, "{e}"),
            },
            _ => writeln!(self.output, "Invalid action."),
        }
    }

    /// Writes `text` and reads one trimmed line; `None` at end of input.
    ///
    /// A line that is not UTF-8 is reported and read as empty, which every
    /// caller already rejects.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        match String::from_utf8(line) {
            Ok(line) => Ok(Some(line.trim().to_string())),
            Err(e) => {
                debug!(error = %e, "discarding non UTF-8 input");
                writeln!(self.output, "Input is not valid UTF-8.")?;
                Ok(Some(String::new()))
            }
        }
    }
}
