use super::histogram::Histogram;
use crate::classes::ClassRegistry;

/// Share of one class in a mask. `None` means undefined: the mask had no
/// pixels in any denominator class.
pub type Percentage = Option<f64>;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Turns class counts into percentages, one per registered class in id order.
///
/// The denominator is the sum of all registered classes except the
/// unclassified bucket and the registry's excluded class. The excluded class
/// is still reported, measured against that same denominator.
pub struct PercentageComputer<'a> {
    registry: &'a ClassRegistry,
}

impl<'a> PercentageComputer<'a> {
    pub fn new(registry: &'a ClassRegistry) -> Self {
        Self { registry }
    }

    pub fn denominator(&self, histogram: &Histogram) -> u64 {
        self.registry
            .classes()
            .iter()
            .filter(|class| self.registry.counts_toward_denominator(class.id))
            .map(|class| histogram.count(class.id))
            .sum()
    }

    pub fn compute(&self, histogram: &Histogram) -> Vec<Percentage> {
        let denominator = self.denominator(histogram);

        self.registry
            .classes()
            .iter()
            .map(|class| {
                if denominator == 0 {
                    return None;
                }
                let share = histogram.count(class.id) as f64 / denominator as f64;
                Some(round2(share * 100.0))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::ClassRegistry;

    fn histogram(counts: &[u64]) -> Histogram {
        Histogram::from_counts(counts.to_vec(), 0)
    }

    #[test]
    fn out_of_focus_uses_tissue_denominator() {
        let registry = ClassRegistry::grandqc();
        let computer = PercentageComputer::new(&registry);
        let counts = histogram(&[0, 2, 1, 0, 0, 0, 1]);

        assert_eq!(computer.denominator(&counts), 3);
        assert_eq!(
            computer.compute(&counts),
            vec![
                Some(66.67),
                Some(33.33),
                Some(0.0),
                Some(0.0),
                Some(0.0),
                Some(33.33)
            ]
        );
    }

    #[test]
    fn unclassified_pixels_are_ignored() {
        let registry = ClassRegistry::grandqc();
        let computer = PercentageComputer::new(&registry);
        let result = computer.compute(&histogram(&[500, 1, 1, 0, 0, 0, 0]));
        assert_eq!(result[0], Some(50.0));
        assert_eq!(result[1], Some(50.0));
    }

    #[test]
    fn percentages_sum_to_hundred_without_excluded_pixels() {
        let registry = ClassRegistry::grandqc();
        let computer = PercentageComputer::new(&registry);
        let result = computer.compute(&histogram(&[4, 7, 3, 11, 5, 2, 0]));
        let sum: f64 = result.iter().map(|p| p.unwrap()).sum();
        assert!((sum - 100.0).abs() <= 0.05, "sum was {sum}");
    }

    #[test]
    fn zero_denominator_is_undefined_not_zero() {
        let registry = ClassRegistry::grandqc();
        let computer = PercentageComputer::new(&registry);

        let background_only = computer.compute(&histogram(&[16, 0, 0, 0, 0, 0, 0]));
        assert_eq!(background_only, vec![None; 6]);

        let out_of_focus_only = computer.compute(&histogram(&[0, 0, 0, 0, 0, 0, 9]));
        assert!(out_of_focus_only.iter().all(Option::is_none));
    }

    #[test]
    fn without_exclusion_every_class_is_in_the_denominator() {
        let registry = ClassRegistry::grandqc_with_exclusion(None);
        let computer = PercentageComputer::new(&registry);
        let result = computer.compute(&histogram(&[0, 2, 1, 0, 0, 0, 1]));
        assert_eq!(result[0], Some(50.0));
        assert_eq!(result[5], Some(25.0));
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(33.333_333), 33.33);
        assert_eq!(round2(12.5), 12.5);
    }
}
