//! Rendering of generated UIDs on stdout.

use std::io::Write;

use anyhow::{Context, Result};
use dhis2_uid::Uid;
use serde::Serialize;

/// Header of the CSV output.
pub const CSV_HEADER: &str = "codes";

/// Output layout of the `uid` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UidFormat {
    /// One line, codes separated by spaces.
    #[default]
    Plain,
    /// `{"codes": [...]}` on one line.
    Json,
    /// A `codes` header followed by one code per line.
    Csv,
}

impl UidFormat {
    /// Picks the format from the command flags; JSON wins over CSV.
    #[must_use]
    pub fn from_flags(json: bool, csv: bool) -> Self {
        if json {
            Self::Json
        } else if csv {
            Self::Csv
        } else {
            Self::Plain
        }
    }
}

#[derive(Serialize)]
struct Codes<'a> {
    codes: &'a [Uid],
}

/// Writes `codes` to `out` in `format`, ending with a newline.
pub fn write_uids<W: Write>(mut out: W, codes: &[Uid], format: UidFormat) -> Result<()> {
    match format {
        UidFormat::Plain => {
            let line: Vec<&str> = codes.iter().map(Uid::as_str).collect();
            writeln!(out, "{}", line.join(" ")).context("write codes")?;
        }
        UidFormat::Json => {
            serde_json::to_writer(&mut out, &Codes { codes }).context("write json")?;
            writeln!(out).context("write json")?;
        }
        UidFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut out);
            writer.write_record([CSV_HEADER]).context("write csv header")?;
            for code in codes {
                writer.write_record([code.as_str()]).context("write csv row")?;
            }
            writer.flush().context("flush csv")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dhis2_uid::{DEFAULT_UID_LENGTH, SeededRandom, generate_uids};

    fn render(format: UidFormat) -> String {
        let codes = generate_uids(3, DEFAULT_UID_LENGTH, &mut SeededRandom::new(123_123));
        let mut buffer = Vec::new();
        write_uids(&mut buffer, &codes, format).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_plain() {
        assert_eq!(
            render(UidFormat::Plain),
            "yKsLePZEg44 kfN3vElj7in rhNv16pTjjc\n"
        );
    }

    #[test]
    fn test_json() {
        assert_eq!(
            render(UidFormat::Json),
            "{\"codes\":[\"yKsLePZEg44\",\"kfN3vElj7in\",\"rhNv16pTjjc\"]}\n"
        );
    }

    #[test]
    fn test_csv() {
        assert_eq!(
            render(UidFormat::Csv),
            "codes\nyKsLePZEg44\nkfN3vElj7in\nrhNv16pTjjc\n"
        );
    }

    #[test]
    fn test_empty_plain() {
        let mut buffer = Vec::new();
        write_uids(&mut buffer, &[], UidFormat::Plain).unwrap();
        assert_eq!(buffer, b"\n");
    }

    #[test]
    fn test_format_flags() {
        assert_eq!(UidFormat::from_flags(false, false), UidFormat::Plain);
        assert_eq!(UidFormat::from_flags(false, true), UidFormat::Csv);
        assert_eq!(UidFormat::from_flags(true, true), UidFormat::Json);
    }
}
