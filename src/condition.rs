//! Guard evaluation for sequence flows.
//!
//! Only flat conjunctions of comparisons are understood, e.g. `${amount &gt; 100 &amp;&amp; risk <= level}`.
//! There is no support for `||`, parentheses or negation.

use crate::api::Variables;
use regex::Regex;
use std::sync::LazyLock;

static COMPARISON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+)\s*(<=|>=|==|!=|<|>)\s*(-?[\w.]+)").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Less,
    Greater,
    Equal,
    LessOrEqual,
    GreaterOrEqual,
    NotEqual,
}

impl Operator {
    fn holds(self, left: f64, right: f64) -> bool {
        match self {
            Operator::Less => left < right,
            Operator::Greater => left > right,
            Operator::Equal => left == right,
            Operator::LessOrEqual => left <= right,
            Operator::GreaterOrEqual => left >= right,
            Operator::NotEqual => left != right,
        }
    }
}

impl TryFrom<&str> for Operator {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(match value {
            "<" => Operator::Less,
            ">" => Operator::Greater,
            "==" => Operator::Equal,
            "<=" => Operator::LessOrEqual,
            ">=" => Operator::GreaterOrEqual,
            "!=" => Operator::NotEqual,
            _ => return Err(()),
        })
    }
}

/// Decide whether a flow guarded by `expression` may be taken.
///
/// Every comparison found in the expression must hold. Unknown variables and
/// unparsable operands make the whole expression false. An expression without
/// comparisons is true.
pub fn evaluate(expression: &str, variables: &Variables) -> bool {
    let expression = normalize(expression);
    COMPARISON.captures_iter(&expression).all(|captures| {
        let Ok(operator) = Operator::try_from(&captures[2]) else {
            return false;
        };
        let operand = &captures[3];
        let Some(right) = variables
            .get(operand)
            .copied()
            .or_else(|| operand.parse::<f64>().ok())
        else {
            log::debug!("Cannot resolve operand {operand} in {expression}");
            return false;
        };
        let Some(left) = variables.get(&captures[1]) else {
            log::debug!("Unknown variable {} in {expression}", &captures[1]);
            return false;
        };
        operator.holds(*left, right)
    })
}

fn normalize(expression: &str) -> String {
    expression
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;&amp;", "&&")
        .replace("${", "")
        .replace('}', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, f64)]) -> Variables {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[test]
    fn escaped_comparison() {
        let variables = vars(&[("amount", 150.0)]);
        assert!(evaluate("${amount &gt; 100}", &variables));
        assert!(!evaluate("${amount &lt; 100}", &variables));
        assert!(evaluate("amount >= 150", &variables));
        assert!(evaluate("amount<=150", &variables));
        assert!(evaluate("amount == 150.0", &variables));
        assert!(!evaluate("amount != 150", &variables));
    }

    #[test]
    fn conjunction() {
        let variables = vars(&[("amount", 150.0), ("risk", 2.0), ("limit", 3.0)]);
        assert!(evaluate("${amount &gt; 100 &amp;&amp; risk &lt; limit}", &variables));
        assert!(!evaluate("${amount &gt; 100 && risk > limit}", &variables));
    }

    #[test]
    fn variable_operand() {
        let variables = vars(&[("amount", 150.0), ("limit", 200.0)]);
        assert!(evaluate("amount < limit", &variables));
        assert!(!evaluate("amount > limit", &variables));
    }

    #[test]
    fn negative_and_decimal_literals() {
        let variables = vars(&[("balance", -2.5)]);
        assert!(evaluate("balance < -1", &variables));
        assert!(evaluate("balance == -2.5", &variables));
    }

    #[test]
    fn unknown_variable_denies() {
        let variables = vars(&[("amount", 150.0)]);
        assert!(!evaluate("${total &gt; 100}", &variables));
        assert!(!evaluate("amount > total", &variables));
        assert!(!evaluate("amount > 100 && total > 1", &variables));
    }

    #[test]
    fn without_comparison_is_true() {
        assert!(evaluate("", &Variables::new()));
        assert!(evaluate("Approved", &Variables::new()));
    }
}
