//! Plain transcript lists, one name per line.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Reads a transcript list, ignoring blank lines and surrounding whitespace.
pub fn read_transcript_list(reader: impl BufRead) -> io::Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for line in reader.lines() {
        let line = line?;
        let name = line.trim();
        if !name.is_empty() {
            names.insert(name.to_string());
        }
    }
    Ok(names)
}

pub fn read_transcript_list_from_path<P: AsRef<Path>>(path: P) -> io::Result<BTreeSet<String>> {
    read_transcript_list(BufReader::new(File::open(path)?))
}

pub fn write_transcript_list<'a>(
    names: impl IntoIterator<Item = &'a str>,
    writer: &mut impl Write,
) -> io::Result<()> {
    for name in names {
        writeln!(writer, "{}", name)?;
    }
    Ok(())
}

pub fn write_transcript_list_to_path<'a, P: AsRef<Path>>(
    names: impl IntoIterator<Item = &'a str>,
    path: P,
) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_transcript_list(names, &mut writer)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn list_round_trips_and_skips_blank_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keep.txt");
        write_transcript_list_to_path(["T2", "T1"], &path).unwrap();
        std::fs::write(&path, std::fs::read_to_string(&path).unwrap() + "\n  \n").unwrap();

        let names = read_transcript_list_from_path(&path).unwrap();
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["T1", "T2"]);
    }
}
