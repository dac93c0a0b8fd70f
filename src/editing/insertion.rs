use crate::editing::geo::haversine_km;
use crate::model::{Coordinates, Waypoint};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsertionChoice {
    /// Index in `[0, len]` at which the candidate should be spliced in.
    pub position: usize,

    /// Extra distance (km) the route gains; `None` when the fallback was used.
    pub added_km: Option<f64>,
}

/// Cost of putting `c` between `prev` and `next` (either may be absent at the ends).
fn insertion_cost(prev: Option<Coordinates>, c: Coordinates, next: Option<Coordinates>) -> f64 {
    match (prev, next) {
        (Some(p), Some(n)) => haversine_km(p, c) + haversine_km(c, n) - haversine_km(p, n),
        (Some(p), None) => haversine_km(p, c),
        (None, Some(n)) => haversine_km(c, n),
        (None, None) => 0.0,
    }
}

/// Picks the position that adds the least traversal distance.
///
/// Without coordinates (on the candidate or any active waypoint) the candidate goes
/// just before the final destination.
pub fn best_insertion(active: &[Waypoint], candidate: &Waypoint) -> InsertionChoice {
    let fallback = InsertionChoice {
        position: if active.len() < 2 {
            active.len()
        } else {
            active.len() - 1
        },
        added_km: None,
    };

    let Some(c) = candidate.coordinates else {
        return fallback;
    };
    let Some(coords) = active
        .iter()
        .map(|w| w.coordinates)
        .collect::<Option<Vec<_>>>()
    else {
        return fallback;
    };

    if coords.is_empty() {
        return InsertionChoice {
            position: 0,
            added_km: Some(0.0),
        };
    }

    let mut best: Option<(usize, f64)> = None;
    for position in 0..=coords.len() {
        let prev = position.checked_sub(1).map(|i| coords[i]);
        let next = coords.get(position).copied();
        let cost = insertion_cost(prev, c, next);

        let better = match best {
            None => true,
            Some((_, b)) => cost < b,
        };
        if better {
            best = Some((position, cost));
        }
    }

    match best {
        Some((position, cost)) => InsertionChoice {
            position,
            added_km: Some(cost),
        },
        None => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wp(name: &str, lat: f64, lng: f64) -> Waypoint {
        Waypoint::new(name).with_coordinates(lat, lng)
    }

    #[test]
    fn picks_the_gap_closest_to_the_candidate() {
        let active = vec![wp("A", 0.0, 0.0), wp("B", 0.0, 2.0), wp("C", 0.0, 4.0)];
        let d = wp("D", 0.1, 1.0);

        let choice = best_insertion(&active, &d);
        assert_eq!(choice.position, 1);
        assert!(choice.added_km.unwrap() > 0.0);
    }

    #[test]
    fn candidate_beyond_the_end_is_appended() {
        let active = vec![wp("A", 0.0, 0.0), wp("B", 0.0, 1.0)];
        let d = wp("D", 0.0, 3.0);
        assert_eq!(best_insertion(&active, &d).position, 2);
    }

    #[test]
    fn missing_coordinates_fall_back_before_destination() {
        let active = vec![wp("A", 0.0, 0.0), Waypoint::new("B"), wp("C", 0.0, 4.0)];
        let d = wp("D", 0.0, 1.0);
        let choice = best_insertion(&active, &d);
        assert_eq!(choice.position, 2);
        assert_eq!(choice.added_km, None);

        let choice = best_insertion(&[wp("A", 0.0, 0.0)], &Waypoint::new("X"));
        assert_eq!(choice.position, 1);
    }
}
