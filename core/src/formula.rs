//! Pure economy formulas. No state, no side effects.

use crate::state::ProducerDef;

/// Price of the next unit: `base_cost * cost_multiplier ^ owned`.
/// Uses the quantity owned before the purchase.
pub fn purchase_cost(def: &ProducerDef) -> f64 {
    def.base_cost * def.cost_multiplier.powf(def.owned as f64)
}

/// Cups per second a single unit yields after upgrades.
pub fn unit_rate(def: &ProducerDef) -> f64 {
    def.base_rate * def.multiplier
}

/// Cups per second from every owned unit of one producer.
pub fn producer_rate(def: &ProducerDef) -> f64 {
    def.owned as f64 * unit_rate(def)
}

/// Total cups per second across all producers.
pub fn total_production_rate<'a>(producers: impl IntoIterator<Item = &'a ProducerDef>) -> f64 {
    producers.into_iter().map(producer_rate).sum()
}

/// Compact display form: `1.50K`, `2.00M`, `3.25B`, or a rounded integer.
pub fn format_amount(value: f64) -> String {
    if value >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{value:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_thresholds() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.4), "999");
        assert_eq!(format_amount(1_000.0), "1.00K");
        assert_eq!(format_amount(1_500.0), "1.50K");
        assert_eq!(format_amount(2_340_000.0), "2.34M");
        assert_eq!(format_amount(7_000_000_000.0), "7.00B");
    }

    #[test]
    fn owned_units_drive_rate() {
        let mut def = ProducerDef::new("Hire Barista", 1.0, 2.0, 1.15);
        assert_eq!(producer_rate(&def), 0.0);
        def.owned = 4;
        def.multiplier = 2.0;
        assert_eq!(producer_rate(&def), 8.0);
    }
}
