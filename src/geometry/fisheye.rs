use crate::config::FisheyeConfig;
use std::f32::consts::PI;

/// Cosine-bell weight of a point `distance` pixels away from the cursor.
///
/// 1.0 at the cursor, 0.0 at and beyond `radius`, with zero slope at both ends
/// so the bulge has no visible kink.
pub fn influence(distance: f32, radius: f32) -> f32 {
    let distance = distance.abs();
    if !(radius > 0.0) || !distance.is_finite() || distance >= radius {
        return 0.0;
    }
    0.5 * (1.0 + (PI * distance / radius).cos())
}

/// Bar thickness at pixel `x` for the given cursor position
pub fn bar_height(x: f32, cursor_x: Option<f32>, config: &FisheyeConfig) -> f32 {
    let Some(cursor) = cursor_x else {
        return config.rest_height;
    };
    let weight = influence(x - cursor, config.influence_radius);
    config.rest_height + (config.max_height - config.rest_height) * weight
}

/// Result of [`displace_markers`]: one horizontal offset per marker
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Displacement {
    pub offsets: Vec<f32>,
    pub snapped: Option<usize>,
}

/// Index of the value closest to `target`. Ties keep the lowest index.
pub fn nearest_index(values: &[f32], target: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            continue;
        }
        let distance = (value - target).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}

/// Compute fisheye offsets for markers at their natural pixel positions.
///
/// The marker nearest the cursor snaps toward it when inside the snap
/// threshold; every other marker inside the push radius is pushed away.
pub fn displace_markers(
    positions: &[f32],
    cursor_x: Option<f32>,
    config: &FisheyeConfig,
) -> Displacement {
    let mut offsets = vec![0.0; positions.len()];

    let Some(cursor) = cursor_x.filter(|c| c.is_finite()) else {
        return Displacement {
            offsets,
            snapped: None,
        };
    };

    let mut snapped = None;
    if let Some(i) = nearest_index(positions, cursor) {
        let distance = (positions[i] - cursor).abs();
        if distance < config.snap_threshold {
            let t = 1.0 - distance / config.snap_threshold;
            // Capped short of the cursor so the marker never lands on it
            let cap = config.snap_cap.clamp(0.0, 1.0) * distance;
            let magnitude = (t * t * config.snap_threshold).min(cap);
            offsets[i] = if positions[i] <= cursor {
                magnitude
            } else {
                -magnitude
            };
            snapped = Some(i);
        }
    }

    for (i, &position) in positions.iter().enumerate() {
        if Some(i) == snapped || !position.is_finite() {
            continue;
        }
        let distance = (position - cursor).abs();
        if !(distance < config.push_radius) {
            continue;
        }
        let t = 1.0 - distance / config.push_radius;
        let push = (t * t * config.max_push).min(config.max_push);
        offsets[i] = if position >= cursor { push } else { -push };
    }

    Displacement { offsets, snapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FisheyeConfig {
        FisheyeConfig::default()
    }

    #[test]
    fn test_influence_shape() {
        assert_eq!(influence(0.0, 80.0), 1.0);
        assert_eq!(influence(80.0, 80.0), 0.0);
        assert_eq!(influence(120.0, 80.0), 0.0);
        assert!((influence(40.0, 80.0) - 0.5).abs() < 1e-6);
        assert_eq!(influence(-20.0, 80.0), influence(20.0, 80.0));
        assert_eq!(influence(10.0, 0.0), 0.0);

        let mut last = 1.0;
        for d in 1..80 {
            let w = influence(d as f32, 80.0);
            assert!(w < last);
            last = w;
        }
    }

    #[test]
    fn test_bar_height_rest_and_peak() {
        let config = config();
        assert_eq!(bar_height(50.0, None, &config), 8.0);
        assert_eq!(bar_height(200.0, Some(200.0), &config), 24.0);
        assert_eq!(bar_height(200.0, Some(280.0), &config), 8.0);
        assert_eq!(bar_height(0.0, Some(500.0), &config), 8.0);

        let mid = bar_height(160.0, Some(200.0), &config);
        assert!(mid > 8.0 && mid < 24.0);
    }

    #[test]
    fn test_no_cursor_no_displacement() {
        let result = displace_markers(&[10.0, 50.0, 90.0], None, &config());
        assert_eq!(result.offsets, vec![0.0, 0.0, 0.0]);
        assert_eq!(result.snapped, None);
    }

    #[test]
    fn test_empty_markers() {
        let result = displace_markers(&[], Some(30.0), &config());
        assert!(result.offsets.is_empty());
        assert_eq!(result.snapped, None);
    }

    #[test]
    fn test_nearest_snaps_toward_cursor() {
        let config = config();
        let positions = [100.0, 300.0, 500.0];
        let result = displace_markers(&positions, Some(310.0), &config);

        assert_eq!(result.snapped, Some(1));
        let offset = result.offsets[1];
        assert!(offset > 0.0);
        assert!(offset.abs() < 10.0);
        // Still on its own side of the cursor
        assert!(positions[1] + offset < 310.0);
        // Far markers untouched
        assert_eq!(result.offsets[0], 0.0);
        assert_eq!(result.offsets[2], 0.0);
    }

    #[test]
    fn test_snap_never_reaches_cursor() {
        let config = config();
        for cursor in [200.5_f32, 201.0, 205.0, 220.0, 239.9, 160.1, 199.0] {
            let result = displace_markers(&[200.0], Some(cursor), &config);
            assert_eq!(result.snapped, Some(0));
            let distance = (200.0 - cursor).abs();
            assert!(result.offsets[0].abs() < distance, "cursor {cursor}");
        }
    }

    #[test]
    fn test_outside_threshold_does_not_snap() {
        let result = displace_markers(&[200.0], Some(250.0), &config());
        assert_eq!(result.snapped, None);
        // Still inside the push radius, so it moves away
        assert!(result.offsets[0] < 0.0);
    }

    #[test]
    fn test_neighbours_pushed_away() {
        let config = config();
        let positions = [150.0, 200.0, 230.0, 400.0];
        let result = displace_markers(&positions, Some(205.0), &config);

        assert_eq!(result.snapped, Some(1));
        assert!(result.offsets[0] < 0.0);
        assert!(result.offsets[2] > 0.0);
        assert!(result.offsets[0].abs() <= config.max_push);
        assert!(result.offsets[2].abs() <= config.max_push);
        assert_eq!(result.offsets[3], 0.0);
    }

    #[test]
    fn test_tie_prefers_lowest_index() {
        let result = displace_markers(&[90.0, 110.0], Some(100.0), &config());
        assert_eq!(result.snapped, Some(0));
        assert!(result.offsets[0] > 0.0);
        assert!(result.offsets[1] > 0.0);
    }

    #[test]
    fn test_at_most_one_snap() {
        let config = config();
        let positions: Vec<f32> = (0..40).map(|i| i as f32 * 7.0).collect();
        for cursor in (0..300).step_by(13) {
            let result = displace_markers(&positions, Some(cursor as f32), &config);
            let snapped_count = usize::from(result.snapped.is_some());
            assert!(snapped_count <= 1);
            assert_eq!(result.offsets.len(), positions.len());
        }
    }
}
