/// Converts a snake_case identifier to camelCase.
///
/// Input that is already camelCase passes through untouched.
pub fn snake_to_camel(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut upper_next = false;

    for (index, ch) in input.chars().enumerate() {
        if ch == '_' {
            // leading underscores are kept, they carry meaning for some keys
            if index == 0 || output.chars().all(|c| c == '_') {
                output.push(ch);
            } else {
                upper_next = true;
            }
            continue;
        }

        if upper_next {
            output.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            output.push(ch);
        }
    }

    output
}

/// Converts each path segment and joins them with `.`.
pub fn camel_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|segment| snake_to_camel(segment.as_ref()))
        .collect::<Vec<_>>()
        .join(".")
}
