//! Arithmetic Expression Evaluation
//!
//! Small recursive evaluator for the expressions the calculator chain
//! produces: `+ - * / ^` and parentheses over f64 operands.

use crate::error::{MentorError, Result};

/// Evaluate an arithmetic expression
pub fn evaluate(expr: &str) -> Result<f64> {
    let expr: String = expr.chars().filter(|c| !c.is_whitespace()).collect();

    if expr.is_empty() {
        return Err(MentorError::Eval("empty expression".into()));
    }

    eval_inner(&expr)
}

fn eval_inner(expr: &str) -> Result<f64> {
    // Innermost parentheses first
    if let Some(start) = expr.rfind('(') {
        let end = expr[start..]
            .find(')')
            .ok_or_else(|| MentorError::Eval("unbalanced parentheses".into()))?;
        let inner = eval_inner(&expr[start + 1..start + end])?;
        let rewritten = format!("{}{}{}", &expr[..start], inner, &expr[start + end + 1..]);
        return eval_inner(&rewritten);
    }

    if expr.contains(')') {
        return Err(MentorError::Eval("unbalanced parentheses".into()));
    }

    // Addition/subtraction (lowest precedence, split last)
    for (i, c) in expr.char_indices().rev() {
        if i > 0 && (c == '+' || c == '-') {
            // Skip unary signs and exponent signs like `1e-3`
            let prev = expr.as_bytes()[i - 1] as char;
            if prev.is_ascii_digit() || prev == ')' {
                let left = eval_inner(&expr[..i])?;
                let right = eval_inner(&expr[i + 1..])?;
                return Ok(if c == '+' { left + right } else { left - right });
            }
        }
    }

    // Multiplication/division
    for (i, c) in expr.char_indices().rev() {
        if c == '*' || c == '/' {
            let left = eval_inner(&expr[..i])?;
            let right = eval_inner(&expr[i + 1..])?;
            if c == '/' && right == 0.0 {
                return Err(MentorError::Eval("division by zero".into()));
            }
            return Ok(if c == '*' { left * right } else { left / right });
        }
    }

    // Power
    if let Some(i) = expr.find('^') {
        let left = eval_inner(&expr[..i])?;
        let right = eval_inner(&expr[i + 1..])?;
        return Ok(left.powf(right));
    }

    expr.parse::<f64>()
        .map_err(|_| MentorError::Eval(format!("not a number: '{}'", expr)))
}

/// Render a result without a trailing `.0` for whole numbers
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expr: &str) -> f64 {
        evaluate(expr).unwrap()
    }

    #[test]
    fn test_basic_operations() {
        assert!((eval("2 + 2") - 4.0).abs() < f64::EPSILON);
        assert!((eval("10 * 5") - 50.0).abs() < f64::EPSILON);
        assert!((eval("9 - 3") - 6.0).abs() < f64::EPSILON);
        assert!((eval("8 / 4") - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_precedence() {
        assert!((eval("2 + 3 * 4") - 14.0).abs() < f64::EPSILON);
        assert!((eval("20 - 6 / 2") - 17.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parentheses() {
        assert!((eval("(2 + 3) * 4") - 20.0).abs() < f64::EPSILON);
        assert!((eval("((1 + 1) * (2 + 3))") - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_power() {
        assert!((eval("2 ^ 8") - 256.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unary_minus() {
        assert!((eval("-3 + 5") - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(evaluate("1 / 0"), Err(MentorError::Eval(_))));
    }

    #[test]
    fn test_garbage_input() {
        assert!(evaluate("what is love").is_err());
        assert!(evaluate("").is_err());
        assert!(evaluate("(1 + 2").is_err());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-12.0), "-12");
    }
}
