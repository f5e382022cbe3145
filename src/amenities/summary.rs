//! Per-category counts and the decorative QAP score.

use serde::Serialize;

use super::types::{Amenity, Category};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmenitySummary {
    pub hospital: usize,
    pub school: usize,
    pub transport: usize,
    pub total: usize,
    pub radius_km: f64,
    pub caption: String,
}

impl AmenitySummary {
    pub fn from_amenities(amenities: &[Amenity], radius_km: f64) -> Self {
        let count = |c: Category| amenities.iter().filter(|a| a.category == c).count();
        Self {
            hospital: count(Category::Hospital),
            school: count(Category::School),
            transport: count(Category::Transport),
            total: amenities.len(),
            radius_km,
            caption: format!("Within {}km radius of the specified location", radius_km),
        }
    }

    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Hospital => self.hospital,
            Category::School => self.school,
            Category::Transport => self.transport,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

// ─── QAP score ──────────────────────────────────────────────────

/// Counts at or above this saturate a category's contribution.
pub const QAP_SATURATION: usize = 5;

const QAP_WEIGHTS: [(Category, f64); 3] = [
    (Category::Hospital, 0.40),
    (Category::School, 0.35),
    (Category::Transport, 0.25),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QapComponent {
    pub category: Category,
    pub weight: f64,
    pub count: usize,
    /// Weighted contribution in percentage points.
    pub points: f64,
}

/// A fixed-weight percentage over the amenity counts. Purely presentational.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QapScore {
    pub percent: u8,
    pub grade: &'static str,
    pub components: Vec<QapComponent>,
}

impl QapScore {
    pub fn compute(summary: &AmenitySummary) -> Self {
        let components: Vec<QapComponent> = QAP_WEIGHTS
            .iter()
            .map(|&(category, weight)| {
                let count = summary.count(category);
                let fill = count.min(QAP_SATURATION) as f64 / QAP_SATURATION as f64;
                QapComponent {
                    category,
                    weight,
                    count,
                    points: weight * fill * 100.0,
                }
            })
            .collect();

        let total: f64 = components.iter().map(|c| c.points).sum();
        let percent = total.round().clamp(0.0, 100.0) as u8;

        Self {
            percent,
            grade: grade_for(percent),
            components,
        }
    }
}

fn grade_for(percent: u8) -> &'static str {
    match percent {
        80..=100 => "Excellent",
        60..=79 => "Good",
        40..=59 => "Fair",
        _ => "Limited",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amenity(category: Category, i: usize) -> Amenity {
        Amenity {
            id: format!("{}-{}", category, i),
            name: format!("Test {}", i),
            category,
            lat: 0.0,
            lng: 0.0,
        }
    }

    fn batch(h: usize, s: usize, t: usize) -> Vec<Amenity> {
        let mut out = Vec::new();
        out.extend((0..h).map(|i| amenity(Category::Hospital, i)));
        out.extend((0..s).map(|i| amenity(Category::School, i)));
        out.extend((0..t).map(|i| amenity(Category::Transport, i)));
        out
    }

    #[test]
    fn test_summary_counts() {
        let s = AmenitySummary::from_amenities(&batch(3, 7, 4), 1.0);
        assert_eq!((s.hospital, s.school, s.transport, s.total), (3, 7, 4, 14));
        assert_eq!(s.caption, "Within 1km radius of the specified location");
    }

    #[test]
    fn test_summary_empty() {
        let s = AmenitySummary::from_amenities(&[], 2.5);
        assert!(s.is_empty());
        assert_eq!(s.caption, "Within 2.5km radius of the specified location");
    }

    #[test]
    fn test_qap_saturates_at_100() {
        let s = AmenitySummary::from_amenities(&batch(7, 5, 6), 1.0);
        let q = QapScore::compute(&s);
        assert_eq!(q.percent, 100);
        assert_eq!(q.grade, "Excellent");
    }

    #[test]
    fn test_qap_empty_is_zero() {
        let q = QapScore::compute(&AmenitySummary::from_amenities(&[], 1.0));
        assert_eq!(q.percent, 0);
        assert_eq!(q.grade, "Limited");
    }

    #[test]
    fn test_qap_minimum_batch() {
        // 3 of each: 0.6 fill everywhere → 60%.
        let q = QapScore::compute(&AmenitySummary::from_amenities(&batch(3, 3, 3), 1.0));
        assert_eq!(q.percent, 60);
        assert_eq!(q.grade, "Good");
        assert_eq!(q.components.len(), 3);
    }

    #[test]
    fn test_qap_weights_hospital_heaviest() {
        let only_h = QapScore::compute(&AmenitySummary::from_amenities(&batch(5, 0, 0), 1.0));
        let only_t = QapScore::compute(&AmenitySummary::from_amenities(&batch(0, 0, 5), 1.0));
        assert_eq!(only_h.percent, 40);
        assert_eq!(only_t.percent, 25);
    }
}
