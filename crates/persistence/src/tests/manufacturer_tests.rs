// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::create_test_persistence;
use crate::PersistenceError;

#[test]
fn test_create_and_get_manufacturer() {
    let mut persistence = create_test_persistence();
    let id = persistence.create_manufacturer("Toyota", "Japan").unwrap();

    let manufacturer = persistence.get_manufacturer(id).unwrap().unwrap();
    assert_eq!(manufacturer.manufacturer_id, id);
    assert_eq!(manufacturer.name, "Toyota");
    assert_eq!(manufacturer.country, "Japan");
}

#[test]
fn test_get_unknown_manufacturer_returns_none() {
    let mut persistence = create_test_persistence();
    assert!(persistence.get_manufacturer(404).unwrap().is_none());
}

#[test]
fn test_list_manufacturers_is_ordered_by_name() {
    let mut persistence = create_test_persistence();
    persistence.create_manufacturer("Volvo", "Sweden").unwrap();
    persistence.create_manufacturer("Audi", "Germany").unwrap();
    persistence.create_manufacturer("Toyota", "Japan").unwrap();

    let names: Vec<String> = persistence
        .list_manufacturers(None)
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, vec!["Audi", "Toyota", "Volvo"]);
}

#[test]
fn test_name_filter_is_case_insensitive_substring() {
    let mut persistence = create_test_persistence();
    persistence.create_manufacturer("Toyota", "Japan").unwrap();
    persistence.create_manufacturer("Tesla", "USA").unwrap();
    persistence.create_manufacturer("Ford", "USA").unwrap();

    let found = persistence.list_manufacturers(Some("toy")).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Toyota");

    let found = persistence.list_manufacturers(Some("T")).unwrap();
    assert_eq!(found.len(), 2);
}

#[test]
fn test_empty_filter_returns_everything() {
    let mut persistence = create_test_persistence();
    persistence.create_manufacturer("Toyota", "Japan").unwrap();
    persistence.create_manufacturer("Ford", "USA").unwrap();

    assert_eq!(persistence.list_manufacturers(Some("")).unwrap().len(), 2);
}

#[test]
fn test_filter_wildcards_match_literally() {
    let mut persistence = create_test_persistence();
    persistence.create_manufacturer("Toyota", "Japan").unwrap();
    persistence
        .create_manufacturer("50% Motors", "Nowhere")
        .unwrap();

    assert!(
        persistence
            .list_manufacturers(Some("_"))
            .unwrap()
            .is_empty()
    );
    let found = persistence.list_manufacturers(Some("%")).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "50% Motors");
}

#[test]
fn test_filter_with_no_match_returns_empty() {
    let mut persistence = create_test_persistence();
    persistence.create_manufacturer("Toyota", "Japan").unwrap();

    assert!(
        persistence
            .list_manufacturers(Some("zzz"))
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_update_manufacturer() {
    let mut persistence = create_test_persistence();
    let id = persistence.create_manufacturer("Toyta", "Japan").unwrap();

    persistence.update_manufacturer(id, "Toyota", "JP").unwrap();

    let manufacturer = persistence.get_manufacturer(id).unwrap().unwrap();
    assert_eq!(manufacturer.name, "Toyota");
    assert_eq!(manufacturer.country, "JP");
}

#[test]
fn test_update_unknown_manufacturer_fails() {
    let mut persistence = create_test_persistence();
    let result = persistence.update_manufacturer(7, "Toyota", "Japan");
    assert_eq!(result, Err(PersistenceError::ManufacturerNotFound(7)));
}

#[test]
fn test_delete_manufacturer_cascades_to_cars() {
    let mut persistence = create_test_persistence();
    let id = persistence.create_manufacturer("Toyota", "Japan").unwrap();
    persistence.create_car("Camry", id).unwrap();
    persistence.create_car("Corolla", id).unwrap();

    persistence.delete_manufacturer(id).unwrap();

    assert!(persistence.get_manufacturer(id).unwrap().is_none());
    assert!(persistence.list_cars(None).unwrap().is_empty());
}

#[test]
fn test_delete_unknown_manufacturer_fails() {
    let mut persistence = create_test_persistence();
    assert_eq!(
        persistence.delete_manufacturer(3),
        Err(PersistenceError::ManufacturerNotFound(3))
    );
}
