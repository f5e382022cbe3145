//! Terminal plot of a search: radius ring, center and amenity markers.

use super::MapView;
use crate::amenities::{Category, KM_PER_DEGREE};

const EMPTY: char = ' ';
const RING: char = '·';
const CENTER: char = '@';

fn glyph(category: Category) -> char {
    match category {
        Category::Hospital => 'H',
        Category::School => 'S',
        Category::Transport => 'T',
    }
}

/// Draw `view` on a `width` × `height` character grid (plus frame and legend).
///
/// Terminal cells are roughly twice as tall as they are wide, so the x axis
/// covers the same distance in twice as many columns.
pub fn render_ascii_map(view: &MapView<'_>, width: usize, height: usize) -> String {
    let width = width.max(11);
    let height = height.max(5);
    let mut out = String::new();

    let center = match view.center {
        Some(c) => c,
        None => {
            out.push_str("  No location yet. Enter an address to see nearby amenities.\n");
            return out;
        }
    };

    // Half-extent in km; leaves a margin outside the ring.
    let half_span = if view.radius_km > 0.0 {
        view.radius_km * 1.2
    } else {
        1.0
    };
    let km_per_col = 2.0 * half_span / (width - 1) as f64;
    let km_per_row = 2.0 * half_span / (height - 1) as f64;
    let cos_lat = center.lat.to_radians().cos();

    let to_cell = |dx_km: f64, dy_km: f64| -> Option<(usize, usize)> {
        let col = ((dx_km + half_span) / km_per_col).round();
        let row = ((half_span - dy_km) / km_per_row).round();
        if col < 0.0 || row < 0.0 || col >= width as f64 || row >= height as f64 {
            return None;
        }
        Some((row as usize, col as usize))
    };

    let mut grid = vec![vec![EMPTY; width]; height];

    if view.radius_km > 0.0 {
        let tolerance = km_per_col.max(km_per_row) / 2.0;
        for (r, line) in grid.iter_mut().enumerate() {
            for (c, cell) in line.iter_mut().enumerate() {
                let dx = c as f64 * km_per_col - half_span;
                let dy = half_span - r as f64 * km_per_row;
                if (dx.hypot(dy) - view.radius_km).abs() <= tolerance {
                    *cell = RING;
                }
            }
        }
    }

    for a in view.markers() {
        let dx = (a.lng - center.lng) * KM_PER_DEGREE * cos_lat;
        let dy = (a.lat - center.lat) * KM_PER_DEGREE;
        if let Some((r, c)) = to_cell(dx, dy) {
            grid[r][c] = glyph(a.category);
        }
    }

    if let Some((r, c)) = to_cell(0.0, 0.0) {
        grid[r][c] = CENTER;
    }

    let rule: String = "═".repeat(width + 2);
    out.push_str(&format!("  ╔{}╗\n", rule));
    for line in &grid {
        out.push_str("  ║ ");
        out.push_str(&line.iter().collect::<String>());
        out.push_str(" ║\n");
    }
    out.push_str(&format!("  ╚{}╝\n", rule));
    out.push_str(&format!(
        "  {} you   H hospital   S school   T transport   {} {} km\n",
        CENTER, RING, view.radius_km
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amenities::Amenity;
    use crate::location::Coordinate;

    fn grid_lines(s: &str) -> Vec<&str> {
        s.lines().filter(|l| l.starts_with("  ║")).collect()
    }

    #[test]
    fn test_no_location_message() {
        let out = render_ascii_map(&MapView::new(None, 1.0, &[]), 40, 20);
        assert!(out.contains("No location yet"));
    }

    #[test]
    fn test_center_in_middle() {
        let c = Coordinate::new(40.0, -74.0);
        let out = render_ascii_map(&MapView::new(Some(&c), 1.0, &[]), 41, 21);
        let lines = grid_lines(&out);
        assert_eq!(lines.len(), 21);
        let middle: Vec<char> = lines[10].chars().collect();
        // "  ║ " prefix is four chars.
        assert_eq!(middle[4 + 20], CENTER);
        assert!(out.contains(RING));
    }

    #[test]
    fn test_amenity_plotted() {
        let c = Coordinate::new(40.0, -74.0);
        let north = [Amenity {
            id: "school-0".into(),
            name: "Academy 1".into(),
            category: Category::School,
            lat: 40.0 + 0.5 / KM_PER_DEGREE,
            lng: -74.0,
        }];
        let out = render_ascii_map(&MapView::new(Some(&c), 1.0, &north), 41, 21);
        let lines = grid_lines(&out);
        let s_row = lines.iter().position(|l| l.contains('S')).unwrap();
        assert!(s_row < 10, "school should plot above center, got row {}", s_row);
    }

    #[test]
    fn test_zero_radius_only_center() {
        let c = Coordinate::new(10.0, 10.0);
        let out = render_ascii_map(&MapView::new(Some(&c), 0.0, &[]), 21, 11);
        let body: String = grid_lines(&out).concat();
        assert!(!body.contains(RING));
        assert!(body.contains(CENTER));
    }
}
