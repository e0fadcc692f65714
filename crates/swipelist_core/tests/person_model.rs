use swipelist_core::{seed_persons, Person};

#[test]
fn person_serialization_uses_expected_wire_fields() {
    let person = Person::new(2, "Teddy", 88);

    let json = serde_json::to_value(&person).unwrap();
    assert_eq!(json["id"], 2);
    assert_eq!(json["name"], "Teddy");
    assert_eq!(json["age"], 88);

    let decoded: Person = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, person);
}

#[test]
fn equality_covers_every_field() {
    assert_ne!(Person::new(1, "Bill", 99), Person::new(1, "Bill", 98));
    assert_eq!(Person::new(1, "Bill", 99), Person::new(1, "Bill", 99));
}

#[test]
fn seed_matches_fixed_screen_contents() {
    let names = seed_persons()
        .into_iter()
        .map(|person| person.name)
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec!["Bill", "Teddy", "Shelly", "Alexander", "Arnold", "Marcy"]
    );
}
