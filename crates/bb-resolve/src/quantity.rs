//! Edge label multipliers.

/// How an edge label was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplier {
    /// No label: one of the target.
    Implicit,
    /// A positive count read from the label.
    Parsed(u64),
    /// The label carried no usable count; treated as one.
    Unparsed,
}

impl Multiplier {
    pub fn value(self) -> u64 {
        match self {
            Multiplier::Parsed(n) => n,
            Multiplier::Implicit | Multiplier::Unparsed => 1,
        }
    }
}

/// Read a quantity from an edge label.
///
/// The first run of ASCII digits is the count, so `3`, `x3`, `×3`, `3x`,
/// `*3` and `qty 3` all read as three. Labels without digits, with a zero
/// count, or with a count too large for `u64` are `Unparsed`.
pub fn parse_multiplier(label: Option<&str>) -> Multiplier {
    let Some(label) = label.map(str::trim).filter(|l| !l.is_empty()) else {
        return Multiplier::Implicit;
    };

    let digits: String = label
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();

    match digits.parse::<u64>() {
        Ok(n) if n > 0 => Multiplier::Parsed(n),
        _ => Multiplier::Unparsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_label_is_implicit() {
        assert_eq!(parse_multiplier(None), Multiplier::Implicit);
        assert_eq!(parse_multiplier(Some("   ")), Multiplier::Implicit);
        assert_eq!(Multiplier::Implicit.value(), 1);
    }

    #[test]
    fn common_count_notations() {
        for label in ["3", "x3", "×3", "3x", "3 ×", "*3", "qty 3", " X3 "] {
            assert_eq!(parse_multiplier(Some(label)), Multiplier::Parsed(3), "{label}");
        }
        assert_eq!(parse_multiplier(Some("x12 pcs")).value(), 12);
    }

    #[test]
    fn unusable_labels_fall_back_to_one() {
        for label in ["contains", "x0", "0", "99999999999999999999999"] {
            let m = parse_multiplier(Some(label));
            assert_eq!(m, Multiplier::Unparsed, "{label}");
            assert_eq!(m.value(), 1);
        }
    }
}
