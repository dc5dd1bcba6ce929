use element_resolution::cache::spatial::{DEFAULT_RADIUS_PX, SpatialCache};
use element_resolution::snapshot::parser::SnapshotIndex;
use element_resolution::snapshot::record::{Position, Role};

use crate::common::utils::{mobile_record, web_record};

mod common;

// ============================================================================
// Keyed storage
// ============================================================================

#[test]
fn get_returns_what_put_stored() {
    let cache = SpatialCache::new();
    assert!(cache.is_empty());

    cache.put("buscar", "home-screen", Position::new(100, 50));

    assert_eq!(cache.get("buscar", "home-screen"), Some(Position::new(100, 50)));
    assert_eq!(cache.len(), 1);
}

#[test]
fn context_separates_entries() {
    let cache = SpatialCache::new();
    cache.put("buscar", "home-screen", Position::new(100, 50));

    assert_eq!(cache.get("buscar", "cart-screen"), None);
    assert_eq!(cache.get("Buscar", "home-screen"), None);
}

#[test]
fn put_overwrites_last_write_wins() {
    let cache = SpatialCache::new();
    cache.put("pagar", "checkout", Position::new(1, 1));
    cache.put("pagar", "checkout", Position::new(2, 2));

    assert_eq!(cache.get("pagar", "checkout"), Some(Position::new(2, 2)));
    assert_eq!(cache.len(), 1);
}

#[test]
fn mark_validated_refreshes_timestamp_only() {
    let cache = SpatialCache::new();
    cache.put("menu", "home", Position::new(30, 60));
    let before = cache.entry("menu", "home").expect("entry present");

    cache.mark_validated("menu", "home");
    let after = cache.entry("menu", "home").expect("entry present");

    assert_eq!(after.position, before.position);
    assert!(after.last_validated_at_ms >= before.last_validated_at_ms);

    // Unknown keys are ignored
    cache.mark_validated("nope", "home");
    assert_eq!(cache.len(), 1);
}

#[test]
fn clear_empties_cache() {
    let cache = SpatialCache::new();
    cache.put("a", "x", Position::new(0, 0));
    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn concurrent_puts_on_distinct_keys() {
    let cache = SpatialCache::new();

    std::thread::scope(|scope| {
        for i in 0..8 {
            let cache = &cache;
            scope.spawn(move || {
                cache.put(&format!("item {}", i), "list", Position::new(i, i * 10));
            });
        }
    });

    assert_eq!(cache.len(), 8);
    assert_eq!(cache.get("item 3", "list"), Some(Position::new(3, 30)));
}

// ============================================================================
// Proximity validation
// ============================================================================

#[test]
fn validate_accepts_nearby_element() {
    let fresh = vec![mobile_record(Role::Button, "Buscar", 105, 53)];
    assert!(SpatialCache::validate(Position::new(100, 50), &fresh, DEFAULT_RADIUS_PX));
}

#[test]
fn validate_rejects_distant_elements() {
    let fresh = vec![
        mobile_record(Role::Button, "Buscar", 300, 50),
        mobile_record(Role::Text, "Hola", 100, 200),
    ];
    assert!(!SpatialCache::validate(Position::new(100, 50), &fresh, DEFAULT_RADIUS_PX));
}

#[test]
fn validate_radius_is_inclusive() {
    // 3-4-5 triangle scaled to exactly 30px
    let fresh = vec![mobile_record(Role::Button, "x", 118, 74)];
    assert!(SpatialCache::validate(Position::new(100, 50), &fresh, 30.0));
    assert!(!SpatialCache::validate(Position::new(100, 50), &fresh, 29.9));
}

#[test]
fn validate_ignores_records_without_position() {
    let fresh = vec![web_record("1_1", Role::Button, "Buscar")];
    assert!(!SpatialCache::validate(Position::new(0, 0), &fresh, 1000.0));
}

#[test]
fn validate_against_empty_list_fails() {
    assert!(!SpatialCache::validate(Position::new(10, 10), &[], DEFAULT_RADIUS_PX));
}

#[test]
fn validate_handles_extreme_coordinates() {
    let index = SnapshotIndex::parse("Button 'A' at (-2000000000, 0)");
    assert!(!SpatialCache::validate(Position::new(2_000_000_000, 0), index.records(), 30.0));

    let far = Position::new(i32::MIN, i32::MIN).distance_to(&Position::new(i32::MAX, i32::MAX));
    assert!(far > 6.0e9);
}

#[test]
fn validate_against_parsed_snapshot() {
    let index = SnapshotIndex::parse("Button 'Buscar' at (105, 53)\nStaticText 'Hola' at (400, 400)");
    assert!(SpatialCache::validate(Position::new(100, 50), index.records(), DEFAULT_RADIUS_PX));
}
