use bytes::Bytes;

const CURRENT_MARKER: &[u8] = b"<<<<<<< HEAD\n";
const SEPARATOR: &[u8] = b"=======\n";
const OTHER_MARKER: &[u8] = b">>>>>>>\n";

/// Working-file content for a conflicted path
///
/// Either side may be missing, in which case its section is left empty.
/// Contents are inserted as they are, without adding a trailing newline.
pub fn materialize(current: Option<&[u8]>, other: Option<&[u8]>) -> Bytes {
    let current = current.unwrap_or_default();
    let other = other.unwrap_or_default();

    [CURRENT_MARKER, current, SEPARATOR, other, OTHER_MARKER]
        .concat()
        .into()
}
