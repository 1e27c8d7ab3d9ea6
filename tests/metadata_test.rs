//! Tests for the metadata extractor

use rstest::rstest;

use umlgen::domain::{metadata, Multiplicity, UmlModel};
use umlgen::util::testing::CAR_MODEL_XML;

#[test]
fn given_car_engine_piston_when_extracting_then_ranges_follow_source_multiplicity() {
    // Arrange
    let model = UmlModel::from_xml(CAR_MODEL_XML).unwrap();

    // Act
    let descriptors = model.build_metadata().unwrap();

    // Assert
    assert_eq!(descriptors.len(), 3);
    let by_name = |name: &str| descriptors.iter().find(|d| d.class == name).unwrap();

    let car = by_name("Car");
    assert!(car.is_root);
    assert_eq!(car.documentation, "A passenger car");
    assert_eq!(car.min, None);
    assert_eq!(car.max, None);

    assert_eq!(by_name("Engine").range(), Some(Multiplicity::exactly(1)));
    assert_eq!(by_name("Piston").range(), Some(Multiplicity::new(1, 4)));
}

#[test]
fn given_car_model_when_serializing_then_range_is_string_encoded_and_optional() {
    // Arrange
    let model = UmlModel::from_xml(CAR_MODEL_XML).unwrap();
    let descriptors = model.build_metadata().unwrap();

    // Act
    let json = metadata::to_json(&descriptors, 4).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    // Assert
    let car = value[0].as_object().unwrap();
    assert!(!car.contains_key("min"));
    assert!(!car.contains_key("max"));
    assert_eq!(value[2]["class"], "Piston");
    assert_eq!(value[2]["min"], "1");
    assert_eq!(value[2]["max"], "4");
    assert_eq!(value[1]["parameters"][0]["name"], "power");
    assert_eq!(value[1]["parameters"][0]["type"], "double");
    assert_eq!(value[1]["parameters"][1]["name"], "Piston");
    assert_eq!(value[1]["parameters"][1]["type"], "class");
}

#[test]
fn given_generated_metadata_when_loading_back_then_parameter_counts_match_model() {
    // Arrange
    let model = UmlModel::from_xml(CAR_MODEL_XML).unwrap();
    let json = metadata::to_json(&model.build_metadata().unwrap(), 4).unwrap();

    // Act
    let loaded = metadata::from_json(&json).unwrap();

    // Assert
    for descriptor in &loaded {
        let class = model.class(&descriptor.class).unwrap();
        let expected = class.attributes.len() + model.children_of(&class.name).count();
        assert_eq!(descriptor.parameters.len(), expected, "{}", descriptor.class);
        let class_refs = descriptor
            .parameters
            .iter()
            .filter(|p| p.is_class_reference())
            .count();
        assert_eq!(class_refs, model.children_of(&class.name).count());
    }
}

#[rstest]
#[case::no_aggregations("")]
#[case::one_edge(
    r#"<Aggregation source="B" target="A" sourceMultiplicity="0..1" targetMultiplicity="1"/>"#
)]
#[case::fan_in(
    r#"<Aggregation source="B" target="A" sourceMultiplicity="1" targetMultiplicity="1"/>
       <Aggregation source="C" target="A" sourceMultiplicity="2" targetMultiplicity="1"/>
       <Aggregation source="C" target="B" sourceMultiplicity="3" targetMultiplicity="1"/>"#
)]
fn given_any_aggregation_shape_when_extracting_then_one_descriptor_per_class(
    #[case] aggregations: &str,
) {
    // Arrange
    let xml = format!(
        r#"<Model><Class name="A" isRoot="true"/><Class name="B"/><Class name="C"/>{aggregations}</Model>"#
    );
    let model = UmlModel::from_xml(&xml).unwrap();

    // Act
    let descriptors = model.build_metadata().unwrap();

    // Assert
    let names: Vec<_> = descriptors.iter().map(|d| d.class.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn given_class_with_two_parents_when_extracting_then_first_edge_sets_range() {
    // Arrange
    let model = UmlModel::from_xml(
        r#"<Model>
            <Class name="A" isRoot="true"/><Class name="B"/><Class name="C"/>
            <Aggregation source="C" target="A" sourceMultiplicity="2" targetMultiplicity="1"/>
            <Aggregation source="C" target="B" sourceMultiplicity="3..5" targetMultiplicity="1"/>
        </Model>"#,
    )
    .unwrap();

    // Act
    let descriptors = model.build_metadata().unwrap();

    // Assert
    assert_eq!(descriptors[2].range(), Some(Multiplicity::exactly(2)));
}
