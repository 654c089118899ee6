//! Property tests for path classification and the missing-field diagnosis

use proptest::prelude::*;
use serde_json::json;
use vehicle_config_audit::json::{self as tolerant, Node};
use vehicle_config_audit::models::MissingField;
use vehicle_config_audit::services::classifier::{
    extract_model_and_config, is_vehicle_info_entry, is_vehicle_info_path,
};
use vehicle_config_audit::services::normalizer;

fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,12}"
}

fn complete_info() -> Node {
    json!({
        "Name": "Car",
        "Brand": "Gavril",
        "Country": "United States",
        "Type": "Car",
        "Body Style": "Sedan",
        "Config Type": "Factory",
        "Configuration": "Base",
        "Years": {"min": 1990, "max": 1998},
        "Value": 12000,
        "Population": 800
    })
}

fn without(fields: &[MissingField]) -> Node {
    let mut root = complete_info();
    let object = root.as_object_mut().unwrap();
    for field in fields {
        // tag labels are the info-file keys
        object.remove(field.label());
    }
    root
}

#[test]
fn test_dropping_each_field_reports_exactly_that_tag() {
    assert!(normalizer::normalize(&complete_info(), "car").missing_fields().is_empty());

    for field in MissingField::ALL {
        let missing = normalizer::normalize(&without(&[field]), "car").missing_fields();
        assert_eq!(missing, vec![field], "dropped {}", field.label());
    }
}

proptest! {
    #[test]
    fn well_formed_entries_classify(model in segment(), config in segment()) {
        let entry = format!("vehicles/{}/info_{}.json", model, config);

        prop_assert!(is_vehicle_info_entry(&entry));
        prop_assert!(is_vehicle_info_path(&entry));
        prop_assert_eq!(
            extract_model_and_config(&entry, true),
            Some((model.clone(), config.clone()))
        );
    }

    #[test]
    fn backslash_paths_match_forward_slash(prefix in segment(), model in segment(), config in segment()) {
        let forward = format!("{}/vehicles/{}/info_{}.json", prefix, model, config);
        let backward = forward.replace('/', "\\");

        prop_assert_eq!(
            extract_model_and_config(&forward, false),
            extract_model_and_config(&backward, false)
        );
        prop_assert_eq!(is_vehicle_info_path(&forward), is_vehicle_info_path(&backward));
    }

    #[test]
    fn files_without_info_prefix_never_classify(model in segment(), name in "[a-hj-z][a-z0-9_]{0,10}") {
        let entry = format!("vehicles/{}/{}.json", model, name);

        prop_assert!(!is_vehicle_info_entry(&entry));
        prop_assert_eq!(extract_model_and_config(&entry, true), None);
    }

    #[test]
    fn missing_tags_follow_fixed_order(
        brand in proptest::option::of("[A-Za-z]{1,8}"),
        country in proptest::option::of("[A-Za-z]{1,8}"),
        value in proptest::option::of(0u32..100_000),
        population in proptest::option::of(0i32..10_000),
    ) {
        let mut root = json!({"Name": "Car"});
        let object = root.as_object_mut().unwrap();
        if let Some(brand) = &brand {
            object.insert("Brand".to_string(), Node::from(brand.as_str()));
        }
        if let Some(country) = &country {
            object.insert("Country".to_string(), Node::from(country.as_str()));
        }
        if let Some(value) = value {
            object.insert("Value".to_string(), Node::from(value));
        }
        if let Some(population) = population {
            object.insert("Population".to_string(), Node::from(population));
        }

        let missing = normalizer::normalize(&root, "car").missing_fields();

        let positions: Vec<usize> = missing
            .iter()
            .map(|field| MissingField::ALL.iter().position(|f| f == field).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert_eq!(missing.contains(&MissingField::Brand), brand.is_none());
        prop_assert_eq!(missing.contains(&MissingField::Value), value.is_none());
        prop_assert_eq!(missing.contains(&MissingField::Population), population.is_none());
        prop_assert!(missing.contains(&MissingField::Years));
    }

    #[test]
    fn dropped_fields_are_the_missing_tags(
        dropped in proptest::sample::subsequence(MissingField::ALL.to_vec(), 0..=MissingField::ALL.len()),
    ) {
        let missing = normalizer::normalize(&without(&dropped), "car").missing_fields();
        prop_assert_eq!(missing, dropped);
    }

    #[test]
    fn serialized_documents_parse_back(name in "[ -~]{0,20}", value in 0i64..1_000_000) {
        let root = json!({"Name": name, "Value": value, "Years": {"min": 1, "max": 2}});
        let text = tolerant::serialize(&root, true);
        prop_assert_eq!(tolerant::parse(&text).unwrap(), root);
    }
}
