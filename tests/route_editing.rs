mod common;

use crate::common::{city, names, paris_barcelona};
use trip_spotlight::editing::{EditError, RouteEditTracker, best_insertion};
use trip_spotlight::model::Waypoint;

#[test]
fn insert_then_undo_restores_the_previous_list() {
    let mut t = RouteEditTracker::new(paris_barcelona());
    let original = t.waypoints(0).unwrap().to_vec();

    let action = t
        .insert_city(0, Waypoint::new("Clermont-Ferrand"), 1)
        .expect("insert failed");
    assert_eq!(action, "Added Clermont-Ferrand after Lyon");
    assert_eq!(
        names(t.waypoints(0).unwrap()),
        ["Lyon", "Clermont-Ferrand", "Montpellier", "Girona"]
    );
    assert_eq!(t.change_count(), 1);
    assert_eq!(t.history().len(), 1);
    assert_eq!(t.history()[0].agent_index, 0);
    assert_eq!(t.history()[0].previous_waypoints, original);
    assert_eq!(t.history()[0].action, action);
    assert!(t.is_user_added(0, "clermont ferrand").unwrap());

    let undone = t.undo().expect("nothing to undo");
    assert_eq!(undone.agent_index, 0);
    assert_eq!(undone.action, action);
    assert_eq!(t.waypoints(0).unwrap(), original.as_slice());
    assert_eq!(t.change_count(), 0);

    // The restored list stays as an overlay, so there is still something to reset.
    assert!(t.is_modified(0));
    assert!(t.has_modifications());
    assert!(t.reset_to_original());
    assert!(!t.is_modified(0));
}

#[test]
fn undo_walks_back_across_variants_in_order() {
    let mut t = RouteEditTracker::new(paris_barcelona());
    let food = t.waypoints(0).unwrap().to_vec();
    let culture = t.waypoints(1).unwrap().to_vec();

    t.insert_city(0, Waypoint::new("Nîmes"), 0).unwrap();
    t.replace_city(1, 2, Waypoint::new("Carcassonne")).unwrap();
    t.insert_city(0, Waypoint::new("Sète"), 4).unwrap();

    assert_eq!(t.undo().unwrap().agent_index, 0);
    assert_eq!(t.undo().unwrap().action, "Replaced Perpignan with Carcassonne");
    assert_eq!(t.waypoints(1).unwrap(), culture.as_slice());
    assert_eq!(t.undo().unwrap().action, "Added Nîmes at start");
    assert_eq!(t.waypoints(0).unwrap(), food.as_slice());
    assert!(t.undo().is_none());
}

#[test]
fn undoing_every_change_restores_every_variant() {
    let originals = paris_barcelona();
    let mut t = RouteEditTracker::new(originals.clone());

    t.insert_city(0, Waypoint::new("Nîmes"), 1).unwrap();
    t.replace_city(1, 0, Waypoint::new("Beaune")).unwrap();
    t.insert_city(1, Waypoint::new("Orange"), 2).unwrap();
    t.replace_city(0, 3, Waypoint::new("Figueres")).unwrap();
    t.insert_city(0, Waypoint::new("Sète"), 0).unwrap();
    t.replace_city(1, 3, Waypoint::new("Narbonne")).unwrap();
    let n = t.change_count();
    assert_eq!(n, 6);

    for _ in 0..n {
        assert!(t.undo().is_some());
    }
    assert!(t.undo().is_none());
    assert_eq!(t.change_count(), 0);

    for (i, v) in originals.iter().enumerate() {
        assert_eq!(t.waypoints(i).unwrap(), v.waypoints.as_slice(), "variant {i}");
    }
    assert_eq!(t.snapshot(), originals);
}

#[test]
fn a_city_already_on_the_route_cannot_be_added_again() {
    let mut t = RouteEditTracker::new(paris_barcelona());

    assert_eq!(
        t.insert_city(0, Waypoint::new("montpellier"), 1),
        Err(EditError::AlreadyPresent {
            name: "montpellier".into()
        })
    );
    assert_eq!(
        names(t.waypoints(0).unwrap()),
        ["Lyon", "Montpellier", "Girona"]
    );
    assert!(!t.has_modifications());

    // A user-added city counts too.
    t.insert_city(0, Waypoint::new("Nîmes"), 1).unwrap();
    assert!(matches!(
        t.insert_city(0, Waypoint::new("Nimes"), 3),
        Err(EditError::AlreadyPresent { .. })
    ));
    assert_eq!(t.change_count(), 1);
}

#[test]
fn reset_is_idempotent() {
    let mut t = RouteEditTracker::new(paris_barcelona());
    assert!(!t.reset_to_original());

    t.replace_city(0, 0, Waypoint::new("Valence")).unwrap();
    assert!(t.reset_to_original());
    assert!(!t.reset_to_original());

    assert!(t.history().is_empty());
    assert_eq!(t.snapshot(), paris_barcelona());
}

#[test]
fn out_of_range_edits_change_nothing() {
    let mut t = RouteEditTracker::new(paris_barcelona());

    assert_eq!(
        t.insert_city(0, Waypoint::new("Arles"), 4),
        Err(EditError::PositionOutOfRange { position: 4, len: 3 })
    );
    assert_eq!(
        t.replace_city(1, 3, Waypoint::new("Arles")),
        Err(EditError::IndexOutOfRange { index: 3, len: 3 })
    );
    assert_eq!(
        t.insert_city(5, Waypoint::new("Arles"), 0),
        Err(EditError::UnknownVariant { index: 5, count: 2 })
    );

    assert!(!t.has_modifications());
    assert_eq!(t.change_count(), 0);
}

#[test]
fn replace_keeps_length_and_marks_user_added() {
    let mut t = RouteEditTracker::new(paris_barcelona());

    t.replace_city(0, 1, Waypoint::new("Nîmes")).unwrap();
    let list = t.waypoints(0).unwrap();
    assert_eq!(names(list), ["Lyon", "Nîmes", "Girona"]);

    let added: Vec<&str> = t
        .user_added(0)
        .unwrap()
        .iter()
        .map(|w| w.name.as_str())
        .collect();
    assert_eq!(added, ["Nîmes"]);
    assert!(!t.is_user_added(0, "LYON").unwrap());
    assert!(t.user_added(1).unwrap().is_empty());
}

#[test]
fn suggested_position_then_insert() {
    let mut t = RouteEditTracker::new(paris_barcelona());

    // Nîmes sits between Lyon and Montpellier on the way south.
    let nimes = city("Nîmes", 43.8367, 4.3601);
    let choice = best_insertion(t.waypoints(0).unwrap(), &nimes);
    assert_eq!(choice.position, 1);
    assert!(choice.added_km.is_some_and(|km| km < 60.0));

    t.insert_city(0, nimes, choice.position).unwrap();
    assert_eq!(
        names(t.waypoints(0).unwrap()),
        ["Lyon", "Nîmes", "Montpellier", "Girona"]
    );

    // No coordinates: goes just before the last stop.
    let guess = best_insertion(t.waypoints(0).unwrap(), &Waypoint::new("Somewhere"));
    assert_eq!(guess.position, 3);
    assert_eq!(guess.added_km, None);
}
