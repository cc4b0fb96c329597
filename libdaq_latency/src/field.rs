use super::error::LineError;

/// Get an integer value from a line of log text given the label that precedes it.
///
/// The label is searched for from the start of the line and only its first occurrence
/// is used. The value must follow the label after exactly one space and runs until the
/// next space. Whitespace at either end of the value (a trailing `\r` or tab) is
/// ignored, but a tab inside it makes the value bad. For example, `"version_number: 2"`
/// gives 2 for the label `"version_number:"`.
pub fn get_value_from_line(line: &str, label: &str) -> Result<i64, LineError> {
    let location = line
        .find(label)
        .ok_or_else(|| LineError::MissingLabel(label.to_string()))?;
    let rest = &line[(location + label.len())..];

    let bad_value = |value: &str| LineError::BadValue {
        label: label.to_string(),
        value: value.to_string(),
    };

    let Some(rest) = rest.strip_prefix(' ') else {
        return Err(bad_value(first_token(rest)));
    };
    let token = first_token(rest);
    token.parse::<i64>().map_err(|_| bad_value(token))
}

fn first_token(text: &str) -> &str {
    text.split(' ').next().unwrap_or("").trim()
}
