use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ProjectionError {
    #[error("{field} must be a number")]
    NotANumber { field: &'static str },
    #[error("{field} cannot be negative")]
    Negative { field: &'static str },
    #[error("{field} is not a finite number")]
    NotFinite { field: &'static str },
}

/// Farm parameters for the profit projection. Field semantics match the
/// in-game numbers players actually know: how many spawners they own, what
/// one drop sells for, and how many drops one spawner produces per minute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FarmInput {
    pub spawner_count: f64,
    pub item_price: f64,
    pub items_per_minute: f64,
}

impl FarmInput {
    /// Parse the three form fields. Empty fields count as zero; anything
    /// negative, non-numeric, or non-finite is rejected with the field named.
    pub fn parse(
        spawner_count: &str,
        item_price: &str,
        items_per_minute: &str,
    ) -> Result<Self, ProjectionError> {
        Ok(Self {
            spawner_count: parse_field("spawner count", spawner_count)?,
            item_price: parse_field("item price", item_price)?,
            items_per_minute: parse_field("items per minute", items_per_minute)?,
        })
    }
}

fn parse_field(field: &'static str, raw: &str) -> Result<f64, ProjectionError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    let value: f64 = raw
        .parse()
        .map_err(|_| ProjectionError::NotANumber { field })?;
    if !value.is_finite() {
        return Err(ProjectionError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ProjectionError::Negative { field });
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionBucket {
    pub label: &'static str,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub profit_per_minute: f64,
    pub profit_per_hour: f64,
    pub buckets: [ProjectionBucket; 3],
}

impl Projection {
    /// Daily potential, i.e. the 24-hour bucket.
    pub fn daily(&self) -> f64 {
        self.buckets[2].amount
    }
}

/// Pure projection: spawners * drops/min * price, scaled to 1h, 12h, and 24h.
pub fn project(input: FarmInput) -> Projection {
    let profit_per_minute = input.spawner_count * input.items_per_minute * input.item_price;
    let profit_per_hour = profit_per_minute * 60.0;

    Projection {
        profit_per_minute,
        profit_per_hour,
        buckets: [
            ProjectionBucket {
                label: "1 Hour",
                amount: profit_per_hour,
            },
            ProjectionBucket {
                label: "12 Hours",
                amount: profit_per_hour * 12.0,
            },
            ProjectionBucket {
                label: "24 Hours",
                amount: profit_per_hour * 24.0,
            },
        ],
    }
}

/// Format an amount the way the server chat does: "$1,234,567".
pub fn format_money(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worked_example_from_the_calculator_defaults() {
        // 10 spawners, $50/item, 12 drops/min
        let input = FarmInput {
            spawner_count: 10.0,
            item_price: 50.0,
            items_per_minute: 12.0,
        };
        let p = project(input);
        assert_eq!(p.profit_per_minute, 6_000.0);
        assert_eq!(p.buckets[0].amount, 360_000.0);
        assert_eq!(p.buckets[1].amount, 4_320_000.0);
        assert_eq!(p.buckets[2].amount, 8_640_000.0);
    }

    #[test]
    fn daily_bucket_is_exact_and_twelve_hours_is_half() {
        let input = FarmInput {
            spawner_count: 7.0,
            item_price: 33.0,
            items_per_minute: 4.0,
        };
        let p = project(input);
        let expected_daily = 7.0 * 33.0 * 4.0 * 60.0 * 24.0;
        assert_eq!(p.buckets[2].amount, expected_daily);
        assert_eq!(p.buckets[1].amount, expected_daily / 2.0);
    }

    #[test]
    fn bucket_order_is_fixed() {
        let p = project(FarmInput {
            spawner_count: 1.0,
            item_price: 1.0,
            items_per_minute: 1.0,
        });
        let labels: Vec<&str> = p.buckets.iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["1 Hour", "12 Hours", "24 Hours"]);
    }

    #[test]
    fn projection_is_deterministic() {
        let input = FarmInput {
            spawner_count: 3.0,
            item_price: 17.5,
            items_per_minute: 9.0,
        };
        assert_eq!(project(input), project(input));
    }

    #[test]
    fn empty_fields_parse_as_zero() {
        let input = FarmInput::parse("", "  ", "").unwrap();
        assert_eq!(input.spawner_count, 0.0);
        assert_eq!(input.item_price, 0.0);
        assert_eq!(input.items_per_minute, 0.0);
        assert_eq!(project(input).daily(), 0.0);
    }

    #[test]
    fn negative_input_is_rejected_with_field_named() {
        let err = FarmInput::parse("10", "-5", "12").unwrap_err();
        assert_eq!(err, ProjectionError::Negative { field: "item price" });
    }

    #[test]
    fn non_numeric_input_is_rejected() {
        let err = FarmInput::parse("ten", "50", "12").unwrap_err();
        assert_eq!(
            err,
            ProjectionError::NotANumber {
                field: "spawner count"
            }
        );
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let err = FarmInput::parse("10", "50", "inf").unwrap_err();
        assert_eq!(
            err,
            ProjectionError::NotFinite {
                field: "items per minute"
            }
        );
    }

    #[test]
    fn money_formatting_groups_thousands() {
        assert_eq!(format_money(8_640_000.0), "$8,640,000");
        assert_eq!(format_money(0.0), "$0");
        assert_eq!(format_money(950.4), "$950");
    }
}
