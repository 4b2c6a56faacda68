//! Dice expressions embedded in directive values.
//!
//! A value like `2d6+1` is rolled at parse time; the command carries the
//! resulting integer, never the expression. The RNG is injected by the
//! caller, so hosts can seed rolls deterministically.

use std::fmt;

use rand::Rng;
use rand::rngs::StdRng;
use tracing::warn;

/// A dice expression: `<count>d<faces>` with an optional `+n`/`-n` tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceExpr {
    /// Number of dice to roll; at least 1.
    pub count: u32,
    /// Sides per die; at least 1.
    pub faces: u32,
    /// Flat modifier added to the sum.
    pub modifier: i64,
}

impl DiceExpr {
    /// Parse an expression like `3d6`, `1d20+4` or `2d8 - 1`. The `d` is
    /// case-insensitive and whitespace may surround the modifier.
    ///
    /// Returns `None` for anything that is not exactly a dice expression
    /// (including zero dice or zero faces); the value grammar then falls
    /// through to its later precedence levels.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let d = s.find(['d', 'D'])?;
        let (count_str, rest) = s.split_at(d);
        let rest = &rest[1..];

        if count_str.is_empty() || !count_str.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let count: u32 = count_str.parse().ok()?;

        let faces_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (faces_str, tail) = rest.split_at(faces_end);
        if faces_str.is_empty() {
            return None;
        }
        let faces: u32 = faces_str.parse().ok()?;

        let tail = tail.trim();
        let modifier = if tail.is_empty() {
            0
        } else {
            let (sign, digits) = tail.split_at(1);
            let digits = digits.trim();
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let magnitude: i64 = digits.parse().ok()?;
            match sign {
                "+" => magnitude,
                "-" => -magnitude,
                _ => return None,
            }
        };

        if count == 0 || faces == 0 {
            return None;
        }
        Some(Self {
            count,
            faces,
            modifier,
        })
    }

    /// Roll the expression: sum `count` uniform draws in `1..=faces`,
    /// then apply the modifier.
    pub fn roll(&self, rng: &mut StdRng) -> i64 {
        if self.count > 100 || self.faces > 100 {
            warn!(expr = %self, "rolling an oversized dice pool");
        }
        let sum: i64 = (0..self.count)
            .map(|_| i64::from(rng.random_range(1..=self.faces)))
            .sum();
        sum + self.modifier
    }

    /// The smallest result this expression can produce.
    pub fn min(&self) -> i64 {
        i64::from(self.count) + self.modifier
    }

    /// The largest result this expression can produce.
    pub fn max(&self) -> i64 {
        i64::from(self.count) * i64::from(self.faces) + self.modifier
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.faces)?;
        if self.modifier > 0 {
            write!(f, "+{}", self.modifier)?;
        } else if self.modifier < 0 {
            write!(f, "{}", self.modifier)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn parse_plain_and_modified() {
        assert_eq!(
            DiceExpr::parse("2d6"),
            Some(DiceExpr {
                count: 2,
                faces: 6,
                modifier: 0
            })
        );
        assert_eq!(
            DiceExpr::parse("1D20+4"),
            Some(DiceExpr {
                count: 1,
                faces: 20,
                modifier: 4
            })
        );
        assert_eq!(
            DiceExpr::parse("2d8 - 1"),
            Some(DiceExpr {
                count: 2,
                faces: 8,
                modifier: -1
            })
        );
    }

    #[test]
    fn parse_rejects_non_dice() {
        assert_eq!(DiceExpr::parse("d6"), None);
        assert_eq!(DiceExpr::parse("2d"), None);
        assert_eq!(DiceExpr::parse("0d6"), None);
        assert_eq!(DiceExpr::parse("2d0"), None);
        assert_eq!(DiceExpr::parse("2d6+x"), None);
        assert_eq!(DiceExpr::parse("2d6+1+2"), None);
        assert_eq!(DiceExpr::parse("sword"), None);
        assert_eq!(DiceExpr::parse("-2d6"), None);
    }

    #[test]
    fn roll_stays_in_bounds() {
        let expr = DiceExpr::parse("3d6+2").unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let rolled = expr.roll(&mut rng);
            assert!((expr.min()..=expr.max()).contains(&rolled));
        }
    }

    #[test]
    fn roll_is_deterministic_per_seed() {
        let expr = DiceExpr::parse("4d10").unwrap();
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        assert_eq!(expr.roll(&mut a), expr.roll(&mut b));
    }

    #[test]
    fn display_round_trips() {
        for raw in ["2d6", "1d20+4", "3d8-2"] {
            let expr = DiceExpr::parse(raw).unwrap();
            assert_eq!(expr.to_string(), raw);
        }
    }

    proptest! {
        #[test]
        fn two_d_six_plus_one_is_always_in_range(seed in any::<u64>()) {
            let expr = DiceExpr::parse("2d6+1").unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let rolled = expr.roll(&mut rng);
            prop_assert!((3..=13).contains(&rolled));
        }
    }
}
