//! End-to-end generation runs against the shipped templates.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use smart_codegen::template::TemplateError;
use smart_codegen::{generate, CodegenError, GeneratorConfig};
use smart_ontology::Ontology;

const ONTOLOGY: &str = r#"{
  "version": "0.5",
  "classes": [
    {
      "name": "Allergy",
      "uri": "http://smartplatforms.org/terms#Allergy",
      "base_path": "/records/{record_id}/allergies/{allergy_id}",
      "example": "<rdf:RDF><sp:Allergy/></rdf:RDF>",
      "object_properties": [
        {"name": "severity", "uri": "http://smartplatforms.org/terms#severity",
         "to_class": "http://smartplatforms.org/terms/codes/AllergySeverity"},
        {"name": "belongsTo", "uri": "http://smartplatforms.org/terms#belongsTo",
         "to_class": "http://smartplatforms.org/terms#MedicalRecord"},
        {"name": "component", "uri": "http://smartplatforms.org/terms#component",
         "to_class": "http://smartplatforms.org/terms#Component"}
      ],
      "data_properties": [
        {"name": "start_date", "uri": "http://smartplatforms.org/terms#startDate"}
      ],
      "calls": [
        {"path": "/records/{record_id}/allergies/", "category": "record_items",
         "description": "Get all Allergies for a patient"},
        {"path": "/records/{record_id}/allergies/{allergy_id}", "category": "record_item"}
      ]
    },
    {
      "name": "MedicalRecord",
      "uri": "http://smartplatforms.org/terms#MedicalRecord"
    },
    {
      "name": "CodedValue",
      "uri": "http://smartplatforms.org/terms#CodedValue",
      "data_properties": [
        {"name": "code", "uri": "http://smartplatforms.org/terms#code"},
        {"name": "title", "uri": "http://purl.org/dc/terms/title"}
      ]
    },
    {
      "name": "AllergySeverity",
      "uri": "http://smartplatforms.org/terms/codes/AllergySeverity",
      "equivalent_classes": {"one_of": [
        {"uri": "http://snomed.info/id/255604002", "title": "Mild"},
        {"uri": "http://snomed.info/id/24484000", "title": "Severe"}
      ]}
    },
    {
      "name": "Problem",
      "uri": "http://smartplatforms.org/terms#Problem",
      "base_path": "/records/{record_id}/problems/{problem_id}",
      "calls": [
        {"path": "/records/{record_id}/problems/", "category": "record_items",
         "http_method": "POST"}
      ]
    },
    {
      "name": "Component",
      "uri": "http://smartplatforms.org/terms#Component"
    },
    {
      "name": "A",
      "uri": "http://example.org/A",
      "object_properties": [
        {"name": "partner", "uri": "http://example.org/partner", "to_class": "http://example.org/B"}
      ]
    },
    {
      "name": "B",
      "uri": "http://example.org/B",
      "object_properties": [
        {"name": "partner", "uri": "http://example.org/partner", "to_class": "http://example.org/A"},
        {"name": "peers", "uri": "http://example.org/peers", "to_class": "http://example.org/A",
         "multiple_cardinality": true}
      ]
    }
  ]
}"#;

fn config(root: &Path) -> GeneratorConfig {
    GeneratorConfig {
        template_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("templates"),
        output_dir: root.join("out"),
        fixtures_dir: root.join("fixtures"),
        tests_dir: root.join("tests"),
        ignore_uris: vec!["http://smartplatforms.org/terms#Component".to_string()],
        generated_on: Some("2012-10-01".to_string()),
        ..GeneratorConfig::default()
    }
}

fn snapshot(root: &Path) -> BTreeMap<PathBuf, String> {
    let mut files = BTreeMap::new();
    for dir in ["out", "fixtures", "tests"] {
        for entry in std::fs::read_dir(root.join(dir)).unwrap() {
            let path = entry.unwrap().path();
            let content = std::fs::read_to_string(&path).unwrap();
            files.insert(path, content);
        }
    }
    files
}

fn read(root: &Path, file: &str) -> String {
    std::fs::read_to_string(root.join(file)).unwrap()
}

#[test]
fn generates_classes_and_aggregates() {
    let ontology = Ontology::from_json(ONTOLOGY).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    let report = generate(&ontology, &config(root)).unwrap();
    assert_eq!(report.class_count, 6);
    assert_eq!(report.classes_written, 6);
    assert_eq!(report.record_getters, 2);
    assert_eq!(report.single_item_getters, 1);
    assert_eq!(report.other_calls, 0);
    assert_eq!(report.fixtures_written, 1);
    assert_eq!(report.unit_tests, 1);
    assert!(report.files_skipped.is_empty());

    for class in ["SMAllergy", "SMMedicalRecord", "SMCodedValue", "SMProblem", "SMA", "SMB"] {
        assert!(root.join(format!("out/{class}.h")).is_file(), "{class}.h");
        assert!(root.join(format!("out/{class}.m")).is_file(), "{class}.m");
    }
    assert!(!root.join("out/SMAllergySeverity.h").exists());
    assert!(!root.join("out/SMComponent.h").exists());

    let allergy = read(root, "out/SMAllergy.h");
    assert!(allergy.contains("#import \"SMDocument.h\""));
    assert!(allergy.contains("@class SMCodedValue, SMMedicalRecord;"));
    assert!(allergy.contains("@interface SMAllergy : SMDocument"));
    assert!(allergy.contains("@property (nonatomic, strong) SMCodedValue *severity;"));
    assert!(allergy.contains("@property (nonatomic, copy) NSString *startDate;"));
    assert!(allergy.contains("Valid codes of http://smartplatforms.org/terms/codes/AllergySeverity"));
    assert!(allergy.contains("http://snomed.info/id/24484000  (Severe)"));
    assert!(!allergy.contains("component"));
    assert!(allergy.contains("on 2012-10-01."));
    assert!(allergy.find("*belongsTo;").unwrap() < allergy.find("*severity;").unwrap());

    let allergy_impl = read(root, "out/SMAllergy.m");
    assert!(allergy_impl.contains("return @\"/records/{record_id}/allergies/{uuid}\";"));
    assert!(!allergy_impl.contains("{{"));

    let record = read(root, "out/SMMedicalRecord.h");
    assert!(record.contains("@interface SMMedicalRecord : SMObject"));

    let calls = read(root, "out/SMRecord+Calls.h");
    assert!(calls.contains("@interface SMRecord (Calls)"));
    assert!(calls.contains("- (void)getAllergies:(INSuccessRetvalueBlock)callback;"));
    assert!(calls.contains("- (void)postProblems:(INSuccessRetvalueBlock)callback;"));
    assert!(!calls.contains("getAllergy:"));
    assert!(calls.find("getAllergies").unwrap() < calls.find("postProblems").unwrap());
    let calls_impl = read(root, "out/SMRecord+Calls.m");
    assert!(calls_impl.contains("@\"/records/%@/allergies/\""));
    assert!(calls_impl.contains("Not yet implemented"));

    let manifest = read(root, "out/SMObjects.h");
    assert!(manifest.contains("#import \"SMAllergy.h\"\n#import \"SMB.h\""));
    assert!(manifest.contains("#import \"SMRecord+Calls.h\""));
    assert!(!manifest.contains("SMAllergySeverity"));

    assert_eq!(
        read(root, "fixtures/SMAllergy.rdf"),
        "<rdf:RDF><sp:Allergy/></rdf:RDF>"
    );
    let tests = read(root, "tests/SMGeneratedTests.m");
    assert!(tests.contains("- (void)testSMAllergy"));
    assert!(tests.contains("[self readFixture:@\"SMAllergy.rdf\"]"));
    assert!(tests.contains("[item.severity isKindOfClass:[SMCodedValue class]]"));
    assert!(!tests.contains("testSMProblem"));
}

#[test]
fn cyclic_classes_are_written_once_each() {
    let ontology = Ontology::from_json(ONTOLOGY).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    generate(&ontology, &config(root)).unwrap();

    let a = read(root, "out/SMA.h");
    let b = read(root, "out/SMB.h");
    assert!(a.contains("@class SMB;"));
    assert!(a.contains("@property (nonatomic, strong) SMB *partner;"));
    assert!(b.contains("@class SMA;"));
    assert!(b.contains("@property (nonatomic, copy) NSArray *peers;"));
    assert!(read(root, "out/SMB.m").contains("objectsOfClass:[SMA class]"));
}

#[test]
fn second_run_without_overwrite_changes_nothing() {
    let ontology = Ontology::from_json(ONTOLOGY).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let config = config(root);

    generate(&ontology, &config).unwrap();
    let first = snapshot(root);

    let report = generate(&ontology, &config).unwrap();
    assert_eq!(snapshot(root), first);
    assert!(report.files_written.is_empty());
    assert_eq!(report.classes_written, 0);
    assert_eq!(report.classes_skipped, 6);
    assert_eq!(report.files_skipped.len(), first.len());
}

#[test]
fn overwriting_runs_are_byte_identical() {
    let ontology = Ontology::from_json(ONTOLOGY).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let config = GeneratorConfig {
        overwrite: true,
        ..config(root)
    };

    generate(&ontology, &config).unwrap();
    let first = snapshot(root);
    let report = generate(&ontology, &config).unwrap();
    assert_eq!(snapshot(root), first);
    assert_eq!(report.classes_written, 6);
    assert!(report.files_skipped.is_empty());
}

#[test]
fn half_present_pair_is_not_completed() {
    let ontology = Ontology::from_json(ONTOLOGY).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("out")).unwrap();
    std::fs::write(root.join("out/SMProblem.h"), "// hand written").unwrap();

    let report = generate(&ontology, &config(root)).unwrap();
    assert_eq!(read(root, "out/SMProblem.h"), "// hand written");
    assert!(!root.join("out/SMProblem.m").exists());
    assert_eq!(report.classes_skipped, 1);
    assert_eq!(report.classes_written, 5);
}

#[test]
fn missing_templates_are_fatal() {
    let ontology = Ontology::from_json(ONTOLOGY).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = GeneratorConfig {
        template_dir: dir.path().join("no-templates"),
        ..config(dir.path())
    };
    assert!(matches!(
        generate(&ontology, &config),
        Err(CodegenError::Template(TemplateError::NotFound { .. }))
    ));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn unwritable_output_is_fatal() {
    let ontology = Ontology::from_json(ONTOLOGY).unwrap();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("out"), "not a directory").unwrap();
    assert!(matches!(
        generate(&ontology, &config(dir.path())),
        Err(CodegenError::OutputNotWritable { .. })
    ));
}

#[test]
fn clashing_class_names_write_the_first_class_only() {
    const CLASHING: &str = r#"{
      "version": "0.5",
      "classes": [
        {
          "name": "allergy_status",
          "uri": "http://smartplatforms.org/terms#allergy_status",
          "data_properties": [
            {"name": "first_note", "uri": "http://smartplatforms.org/terms#firstNote"}
          ]
        },
        {
          "name": "AllergyStatus",
          "uri": "http://example.org/other#AllergyStatus",
          "data_properties": [
            {"name": "second_note", "uri": "http://example.org/other#secondNote"}
          ]
        }
      ]
    }"#;
    let ontology = Ontology::from_json(CLASHING).unwrap();

    for overwrite in [false, true] {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let config = GeneratorConfig {
            overwrite,
            ..config(root)
        };
        let report = generate(&ontology, &config).unwrap();
        assert_eq!(report.class_count, 1);
        assert_eq!(report.classes_written, 1);
        assert_eq!(report.classes_skipped, 0);

        let header = read(root, "out/SMAllergyStatus.h");
        assert!(header.contains("*firstNote;"));
        assert!(!header.contains("secondNote"));
    }
}
