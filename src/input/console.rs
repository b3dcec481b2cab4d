use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};

use chrono::NaiveDate;
use tracing::debug;

use crate::error::Rejection;
use crate::input::parse;

/// Line-oriented prompt/read/validate loop over any reader and writer
pub struct Console<R, W> {
    input: R,
    output: W,
}

/// The console the binary runs against
pub type StdConsole = Console<StdinLock<'static>, Stdout>;

impl StdConsole {
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Console::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `label`, read one line and run it through `parse`.
    ///
    /// A refused entry prints the rejection and asks again; the loop only
    /// ends on a parsed value. End of input is reported as
    /// [`io::ErrorKind::UnexpectedEof`] since no further entry can arrive.
    pub fn prompt<T, F>(&mut self, label: &str, parse: F) -> io::Result<T>
    where
        F: Fn(&str) -> Result<T, Rejection>,
    {
        loop {
            let raw = self.read_line(label)?;
            match parse(&raw) {
                Ok(value) => return Ok(value),
                Err(rejection) => {
                    debug!(%label, ?rejection, "input rejected");
                    writeln!(self.output, "{rejection}")?;
                }
            }
        }
    }

    pub fn text(&mut self, label: &str) -> io::Result<String> {
        self.prompt(label, parse::text)
    }

    /// Blank entries are accepted and come back as `None`
    pub fn optional_text(&mut self, label: &str) -> io::Result<Option<String>> {
        let raw = self.read_line(label)?;
        Ok(parse::optional_text(&raw))
    }

    pub fn digits(&mut self, label: &str) -> io::Result<String> {
        self.prompt(label, parse::digits)
    }

    pub fn integer(&mut self, label: &str) -> io::Result<u64> {
        self.prompt(label, parse::integer)
    }

    #[cfg(test)]
    pub fn decimal(&mut self, label: &str) -> io::Result<f64> {
        self.prompt(label, parse::decimal)
    }

    pub fn amount(&mut self, label: &str) -> io::Result<f64> {
        self.prompt(label, parse::amount)
    }

    pub fn date(&mut self, label: &str) -> io::Result<NaiveDate> {
        self.prompt(label, parse::date)
    }

    pub fn boolean(&mut self, label: &str) -> io::Result<bool> {
        self.prompt(label, parse::boolean)
    }

    pub fn choice(&mut self, label: &str, min: u64, max: u64) -> io::Result<u64> {
        self.prompt(label, |raw| parse::choice(raw, min, max))
    }

    /// Write one line of output
    pub fn say(&mut self, line: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    #[cfg(test)]
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    fn read_line(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "console input closed while waiting for an entry",
            ));
        }
        Ok(line)
    }
}
