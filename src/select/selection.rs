use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Invalid selection. `{0}` is not a number")]
    NotANumber(String),
    #[error("Invalid selection. Please enter a number between 1 and {max}")]
    OutOfRange { value: usize, max: usize },
    #[error("Invalid selection. Please enter a valid number or list of numbers")]
    Empty,
}

/// Validate a single 1-based choice out of `count` items; returns the 0-based index.
pub fn parse_org_choice(input: &str, count: usize) -> Result<usize, SelectionError> {
    parse_index(input.trim(), count)
}

/// Validate a network selection: `0` for every network, or comma-separated 1-based
/// indices. Returns 0-based indices in the order given; duplicates are kept.
pub fn parse_network_choice(input: &str, count: usize) -> Result<Vec<usize>, SelectionError> {
    let input = input.trim();

    let indices: Vec<usize> = if input == "0" {
        (0..count).collect()
    } else {
        input
            .split(',')
            .map(|part| parse_index(part.trim(), count))
            .collect::<Result<_, _>>()?
    };

    if indices.is_empty() {
        return Err(SelectionError::Empty);
    }
    Ok(indices)
}

fn parse_index(raw: &str, count: usize) -> Result<usize, SelectionError> {
    let value: usize = raw
        .parse()
        .map_err(|_| SelectionError::NotANumber(raw.to_string()))?;

    if value == 0 || value > count {
        return Err(SelectionError::OutOfRange { value, max: count });
    }
    Ok(value - 1)
}
