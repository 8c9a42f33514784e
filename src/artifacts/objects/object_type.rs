use anyhow::Context;
use std::fmt;
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Blob,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Commit => "commit",
        }
    }

    /// Consume the `<type> <size>\0` envelope, returning the type and the declared body size
    pub fn read_envelope(reader: &mut impl BufRead) -> anyhow::Result<(ObjectType, usize)> {
        let object_type = read_field(reader, b' ').context("Invalid object: missing type")?;
        let size = read_field(reader, b'\0').context("Invalid object: missing size")?;

        let size = size
            .parse::<usize>()
            .with_context(|| format!("Invalid object: malformed size {size:?}"))?;

        Ok((object_type.parse()?, size))
    }
}

fn read_field(reader: &mut impl BufRead, terminator: u8) -> anyhow::Result<String> {
    let mut field = Vec::new();
    reader.read_until(terminator, &mut field)?;

    if field.pop() != Some(terminator) {
        anyhow::bail!("unterminated field");
    }

    Ok(String::from_utf8(field)?)
}

impl std::str::FromStr for ObjectType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "commit" => Ok(ObjectType::Commit),
            other => anyhow::bail!("Invalid object type: {other}"),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    #[rstest]
    #[case(b"blob 3\0abc", ObjectType::Blob, 3)]
    #[case(b"commit 0\0", ObjectType::Commit, 0)]
    fn reads_the_envelope(
        #[case] bytes: &[u8],
        #[case] expected_type: ObjectType,
        #[case] expected_size: usize,
    ) {
        let mut reader = Cursor::new(bytes);

        assert_eq!(
            ObjectType::read_envelope(&mut reader).unwrap(),
            (expected_type, expected_size)
        );
    }

    #[rstest]
    #[case(b"tree 3\0abc")]
    #[case(b"blob x\0abc")]
    #[case(b"blob 3")]
    #[case(b"")]
    fn rejects_malformed_envelopes(#[case] bytes: &[u8]) {
        assert!(ObjectType::read_envelope(&mut Cursor::new(bytes)).is_err());
    }
}
