use hy_project::schema::*;
use hy_project::{load_json, load_yaml, save_json, save_yaml, validate_project};
use std::collections::BTreeMap;

fn weir_project() -> Project {
    Project {
        version: 1,
        name: "Weirs".to_string(),
        settings: SettingsDef {
            tolerance: Some(1e-8),
            perimeter: Some(PerimeterDef::Reference),
            ..SettingsDef::default()
        },
        cases: vec![CaseDef {
            id: "weir".to_string(),
            name: "Sharp-crested weir".to_string(),
            settings: Some(SettingsDef {
                approach_velocity_head: Some(true),
                fault_policy: Some(FaultPolicyDef::WholeBatch),
                ..SettingsDef::default()
            }),
            operations: vec!["sharp_crested_discharge".to_string()],
            inputs: BTreeMap::from([
                ("approach_depth".to_string(), vec![0.5, 0.9]),
                ("crest_height".to_string(), vec![0.3, 0.5]),
            ]),
            broadcast: BTreeMap::from([("base_width".to_string(), 1.0)]),
        }],
        pumps: vec![PumpDef {
            id: "p1".to_string(),
            name: "Pump".to_string(),
            head: [30.0, 0.0, -500.0],
            efficiency: [7.0, -20.0],
            speed_ratios: vec![1.0, 0.5],
        }],
        circular_channels: vec![],
        drip_units: vec![],
    }
}

#[test]
fn roundtrip_yaml_empty_project() {
    let project = Project {
        version: 1,
        name: "Empty Project".to_string(),
        settings: SettingsDef::default(),
        cases: vec![],
        pumps: vec![],
        circular_channels: vec![],
        drip_units: vec![],
    };

    validate_project(&project).unwrap();

    let path = std::env::temp_dir().join("hy_project_roundtrip_empty.yaml");
    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(project, loaded);
}

#[test]
fn roundtrip_yaml_weir_case() {
    let project = weir_project();
    let path = std::env::temp_dir().join("hy_project_roundtrip_weir.yaml");
    save_yaml(&path, &project).unwrap();
    assert_eq!(project, load_yaml(&path).unwrap());
}

#[test]
fn roundtrip_json_weir_case() {
    let project = weir_project();
    let path = std::env::temp_dir().join("hy_project_roundtrip_weir.json");
    save_json(&path, &project).unwrap();
    assert_eq!(project, load_json(&path).unwrap());
}

#[test]
fn case_settings_overlay_project_settings() {
    let project = weir_project();
    let merged = project
        .settings
        .overlaid(project.cases[0].settings.as_ref().unwrap());
    assert_eq!(merged.tolerance, Some(1e-8));
    assert_eq!(merged.approach_velocity_head, Some(true));
    assert_eq!(merged.perimeter, Some(PerimeterDef::Reference));
    assert_eq!(merged.gravity_mps2, None);
}

#[test]
fn save_refuses_invalid_project() {
    let mut project = weir_project();
    project.cases[0].operations = vec!["pipe_slope".to_string()];
    let path = std::env::temp_dir().join("hy_project_roundtrip_invalid.yaml");
    assert!(save_yaml(&path, &project).is_err());
}
