//! Class descriptor building: ontology class → target-language class.
//!
//! [`DescriptorBuilder::build`] resolves one class into a
//! [`ClassDescriptor`], recursing into the classes its object properties
//! reference. Every IRI is registered in the [`Session`] before recursion, so
//! cyclic references terminate and each class is built at most once.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use smart_ontology::{ClassId, Ontology, OntologyClass};
use tracing::{debug, info, warn};

use crate::bindings::{
    BasePathBindings, ClassBindings, CodedValuesBindings, FileMetadata, ForwardBindings,
    GetterBindings, PropertyBindings, UnitTestAssertionBindings,
};
use crate::calls::{classify, RECORD_ID};
use crate::config::GeneratorConfig;
use crate::naming::{local_name, NamingPolicy};
use crate::session::{Resolved, Session, ValidValues};
use crate::template::{TemplateError, TemplateName, TemplateSet};

/// Whether a property points at another class or at a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Object property.
    Object,
    /// Data property.
    Literal,
}

/// Whether a property holds one value or a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    /// One value.
    Single,
    /// A collection of values.
    Collection,
}

/// Ownership qualifier of a declared property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Exclusive reference to a single object.
    Strong,
    /// Shared copy (literals and collections).
    Copy,
}

impl Ownership {
    /// Qualifier as written in the declaration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Ownership::Strong => "strong",
            Ownership::Copy => "copy",
        }
    }
}

/// The four accessor shapes, one template each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetterShape {
    /// One object.
    SingleObject,
    /// A collection of objects.
    MultiObject,
    /// One literal.
    SingleLiteral,
    /// A collection of literals.
    MultiLiteral,
}

impl GetterShape {
    /// Picks the shape for a property.
    #[must_use]
    pub fn of(kind: PropertyKind, accessor: AccessorKind) -> Self {
        match (kind, accessor) {
            (PropertyKind::Object, AccessorKind::Single) => GetterShape::SingleObject,
            (PropertyKind::Object, AccessorKind::Collection) => GetterShape::MultiObject,
            (PropertyKind::Literal, AccessorKind::Single) => GetterShape::SingleLiteral,
            (PropertyKind::Literal, AccessorKind::Collection) => GetterShape::MultiLiteral,
        }
    }

    /// Template rendering this shape.
    #[must_use]
    pub fn template(self) -> TemplateName {
        match self {
            GetterShape::SingleObject => TemplateName::GetterSingleObject,
            GetterShape::MultiObject => TemplateName::GetterMultiObject,
            GetterShape::SingleLiteral => TemplateName::GetterSingleLiteral,
            GetterShape::MultiLiteral => TemplateName::GetterMultiLiteral,
        }
    }
}

/// A resolved property of a generated class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRecord {
    /// Normalized property name.
    pub name: String,
    /// Property IRI.
    pub uri: String,
    /// Object or literal.
    pub kind: PropertyKind,
    /// Type of one value.
    pub target_type: String,
    /// Declared type: the collection type for collections, else `target_type`.
    pub use_type: String,
    /// Ownership qualifier.
    pub ownership: Ownership,
    /// Single or collection accessor.
    pub accessor: AccessorKind,
    /// Valid codes when the target is a coded class: (value set IRI, codes).
    pub valid_values: Option<(String, ValidValues)>,
}

impl PropertyRecord {
    /// Accessor shape of this property.
    #[must_use]
    pub fn getter_shape(&self) -> GetterShape {
        GetterShape::of(self.kind, self.accessor)
    }
}

/// Everything needed to render one class's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDescriptor {
    /// Normalized class name.
    pub class_name: String,
    /// Superclass name.
    pub superclass_name: String,
    /// Dependent class names, sorted and unique.
    pub forward_declarations: BTreeSet<String>,
    /// Properties sorted by normalized name.
    pub properties: Vec<PropertyRecord>,
    /// Rendered property declarations, parallel to `properties`.
    pub property_declarations: Vec<String>,
    /// Rendered accessor bodies, parallel to `properties`.
    pub accessor_bodies: Vec<String>,
    /// Normalized base path.
    pub base_path: Option<String>,
    /// Rendered base path accessor.
    pub base_path_accessor: Option<String>,
    /// IRI of the ontology class.
    pub rdf_type: String,
    /// Example payload, if the class carries a non-empty one.
    pub example_payload: Option<String>,
    /// Rendered unit-test assertions, one per property. Empty without an example.
    pub unit_test_assertions: Vec<String>,
}

impl ClassDescriptor {
    /// Renders the declaration and definition files.
    ///
    /// # Errors
    ///
    /// Propagates template rendering errors.
    pub fn render_files(
        &self,
        templates: &TemplateSet,
        meta: &FileMetadata,
    ) -> Result<(String, String), TemplateError> {
        let forwards = if self.forward_declarations.is_empty() {
            String::new()
        } else {
            let class_names = self
                .forward_declarations
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            templates.render(
                TemplateName::ForwardDeclaration,
                &ForwardBindings { class_names },
            )?
        };

        let bindings = ClassBindings {
            class_name: self.class_name.clone(),
            superclass: self.superclass_name.clone(),
            forwards,
            properties: self.property_declarations.join("\n"),
            getters: self.accessor_bodies.join("\n"),
            base_path: self.base_path_accessor.clone(),
            rdf_type: self.rdf_type.clone(),
            meta: meta.clone(),
        };
        let header = templates.render(TemplateName::ClassHeader, &bindings)?;
        let implementation = templates.render(TemplateName::ClassImplementation, &bindings)?;
        Ok((header, implementation))
    }
}

/// Builds class descriptors for one ontology.
pub struct DescriptorBuilder<'a> {
    ontology: &'a Ontology,
    config: &'a GeneratorConfig,
    templates: &'a TemplateSet,
    naming: NamingPolicy,
    coded_type: String,
}

impl<'a> DescriptorBuilder<'a> {
    /// Creates a builder.
    pub fn new(
        ontology: &'a Ontology,
        config: &'a GeneratorConfig,
        templates: &'a TemplateSet,
    ) -> Self {
        let naming = config.naming();
        let coded_name = ontology
            .find_class(&config.coded_value_class)
            .map(|class| class.name.as_str())
            .unwrap_or_else(|| local_name(&config.coded_value_class));
        let coded_type = naming
            .normalize_type_name(coded_name)
            .unwrap_or_else(|| format!("{}CodedValue", config.class_prefix));
        Self {
            ontology,
            config,
            templates,
            naming,
            coded_type,
        }
    }

    /// Builds the descriptor of class `id`.
    ///
    /// Returns `Ok(None)` if the class was already resolved in this session,
    /// is excluded, or is a coded value. Classes first reached through
    /// `id`'s properties are queued in the session's pending list.
    ///
    /// # Errors
    ///
    /// Propagates template rendering errors.
    pub fn build(
        &self,
        id: ClassId,
        session: &mut Session,
    ) -> Result<Option<ClassDescriptor>, TemplateError> {
        let Some(class) = self.ontology.class(id) else {
            return Ok(None);
        };
        if session.known(&class.uri).is_some() {
            info!("{} is already known, skipping", class.name);
            return Ok(None);
        }
        let (_, descriptor) = self.resolve_new(class, session)?;
        Ok(descriptor)
    }

    /// Resolves class `id` to a type name, building it on first visit.
    fn resolve(&self, id: ClassId, session: &mut Session) -> Result<Resolved, TemplateError> {
        let Some(class) = self.ontology.class(id) else {
            return Ok(Resolved::Excluded);
        };
        if let Some(resolved) = session.known(&class.uri) {
            return Ok(resolved.clone());
        }
        let (resolved, descriptor) = self.resolve_new(class, session)?;
        if let Some(descriptor) = descriptor {
            session.push_pending(descriptor);
        }
        Ok(resolved)
    }

    fn resolve_new(
        &self,
        class: &OntologyClass,
        session: &mut Session,
    ) -> Result<(Resolved, Option<ClassDescriptor>), TemplateError> {
        if self.is_excluded(class) {
            session.register(&class.uri, Resolved::Excluded);
            return Ok((Resolved::Excluded, None));
        }

        if self.is_coded(class) {
            let resolved = self.collapse_coded(class, session);
            return Ok((resolved, None));
        }

        let Some(class_name) = self.naming.normalize_type_name(&class.name) else {
            warn!("{} has no usable class name, skipping", class.uri);
            session.register(&class.uri, Resolved::Excluded);
            return Ok((Resolved::Excluded, None));
        };

        if let Some(owner) = session.name_owner(&class_name) {
            warn!(
                "{} also normalizes to {class_name}, which belongs to {owner}, skipping",
                class.uri
            );
            session.register(&class.uri, Resolved::Excluded);
            return Ok((Resolved::Excluded, None));
        }

        session.register(&class.uri, Resolved::Class(class_name.clone()));
        let descriptor = self.describe(class, class_name.clone(), session)?;
        Ok((Resolved::Class(class_name), Some(descriptor)))
    }

    fn is_excluded(&self, class: &OntologyClass) -> bool {
        if self.config.ignore_uris.iter().any(|uri| *uri == class.uri) {
            info!("{} is on the ignore list, skipping", class.uri);
            return true;
        }
        if self.config.ignore_names.iter().any(|name| *name == class.name) {
            warn!(
                "{} ignored by name; ignore_names is deprecated, list {} in ignore_uris",
                class.name, class.uri
            );
            return true;
        }
        if self
            .config
            .reserved_namespaces
            .iter()
            .any(|ns| *ns == class.uri)
        {
            debug!("{} is a reserved namespace, skipping", class.uri);
            return true;
        }
        false
    }

    fn is_coded(&self, class: &OntologyClass) -> bool {
        !self.config.codes_namespace.is_empty()
            && class.uri.starts_with(&self.config.codes_namespace)
    }

    /// Maps a coded class onto the shared coded type and records its codes.
    fn collapse_coded(&self, class: &OntologyClass, session: &mut Session) -> Resolved {
        if let Some(enumeration) = &class.equivalent_classes {
            let values: ValidValues = enumeration
                .one_of
                .iter()
                .map(|code| (code.uri.clone(), code.title.clone()))
                .collect();
            if !values.is_empty() {
                debug!("{} defines {} valid codes", class.uri, values.len());
                session.register_valid_values(&class.uri, values);
            }
        }
        let resolved = Resolved::Coded(self.coded_type.clone());
        session.register(&class.uri, resolved.clone());
        resolved
    }

    fn describe(
        &self,
        class: &OntologyClass,
        class_name: String,
        session: &mut Session,
    ) -> Result<ClassDescriptor, TemplateError> {
        debug!("Building {class_name} from {}", class.uri);

        let superclass_name = if class.base_path.is_some() {
            self.config.document_superclass.clone()
        } else {
            self.config.object_superclass.clone()
        };

        let mut forward_declarations = BTreeSet::new();
        let mut properties = Vec::new();

        for prop in &class.object_properties {
            let Some(name) = self.naming.normalize_property_name(&prop.name) else {
                warn!("{} has no usable property name, omitting", prop.uri);
                continue;
            };
            let Some(target_id) = prop.to_class else {
                warn!("{} of {class_name} has no resolvable target, omitting", prop.uri);
                continue;
            };
            let resolved = self.resolve(target_id, session)?;
            let Some(target_type) = resolved.type_name().map(str::to_string) else {
                warn!("{} of {class_name} targets an excluded class, omitting", prop.uri);
                continue;
            };

            let valid_values = match resolved {
                Resolved::Coded(_) => self.ontology.class(target_id).and_then(|target| {
                    session
                        .valid_values(&target.uri)
                        .map(|values| (target.uri.clone(), values.clone()))
                }),
                _ => None,
            };

            if target_type != class_name {
                forward_declarations.insert(target_type.clone());
            }
            properties.push(self.property(
                name,
                &prop.uri,
                PropertyKind::Object,
                target_type,
                prop.multiple_cardinality,
                valid_values,
            ));
        }

        for prop in &class.data_properties {
            let Some(name) = self.naming.normalize_property_name(&prop.name) else {
                warn!("{} has no usable property name, omitting", prop.uri);
                continue;
            };
            // TODO: refine literals to numbers and dates once the ontology exposes datatype ranges.
            properties.push(self.property(
                name,
                &prop.uri,
                PropertyKind::Literal,
                self.config.literal_type.clone(),
                prop.multiple_cardinality,
                None,
            ));
        }

        properties.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.uri.cmp(&b.uri)));

        let mut property_declarations = Vec::with_capacity(properties.len());
        let mut accessor_bodies = Vec::with_capacity(properties.len());
        for prop in &properties {
            property_declarations.push(self.render_declaration(prop)?);
            accessor_bodies.push(self.templates.render(
                prop.getter_shape().template(),
                &GetterBindings {
                    name: prop.name.clone(),
                    uri: prop.uri.clone(),
                    use_type: prop.use_type.clone(),
                    item_type: prop.target_type.clone(),
                },
            )?);
        }

        let base_path = class.base_path.as_deref().map(normalize_base_path);
        let base_path_accessor = match &base_path {
            Some(path) => Some(self.templates.render(
                TemplateName::BasePathAccessor,
                &BasePathBindings {
                    base_path: path.clone(),
                },
            )?),
            None => None,
        };

        for call in &class.calls {
            session.collect_call(classify(&class_name, call, &self.naming));
        }

        let example_payload = class.non_empty_example().map(str::to_string);
        let mut unit_test_assertions = Vec::new();
        if example_payload.is_some() {
            for prop in &properties {
                unit_test_assertions.push(self.templates.render(
                    TemplateName::UnitTestAssertion,
                    &UnitTestAssertionBindings {
                        class_name: class_name.clone(),
                        property_name: prop.name.clone(),
                        use_type: prop.use_type.clone(),
                    },
                )?);
            }
        }

        Ok(ClassDescriptor {
            class_name,
            superclass_name,
            forward_declarations,
            properties,
            property_declarations,
            accessor_bodies,
            base_path,
            base_path_accessor,
            rdf_type: class.uri.clone(),
            example_payload,
            unit_test_assertions,
        })
    }

    fn property(
        &self,
        name: String,
        uri: &str,
        kind: PropertyKind,
        target_type: String,
        multiple: bool,
        valid_values: Option<(String, ValidValues)>,
    ) -> PropertyRecord {
        let (use_type, ownership, accessor) = if multiple {
            (
                self.config.collection_type.clone(),
                Ownership::Copy,
                AccessorKind::Collection,
            )
        } else {
            let ownership = match kind {
                PropertyKind::Object => Ownership::Strong,
                PropertyKind::Literal => Ownership::Copy,
            };
            (target_type.clone(), ownership, AccessorKind::Single)
        };
        PropertyRecord {
            name,
            uri: uri.to_string(),
            kind,
            target_type,
            use_type,
            ownership,
            accessor,
            valid_values,
        }
    }

    fn render_declaration(&self, prop: &PropertyRecord) -> Result<String, TemplateError> {
        let comment = match &prop.valid_values {
            Some((value_set, values)) => {
                let lines = values
                    .iter()
                    .map(|(code, title)| format!("{code}  ({title})"))
                    .collect::<Vec<_>>()
                    .join("\n");
                Some(self.templates.render(
                    TemplateName::CodedValuesComment,
                    &CodedValuesBindings {
                        value_set: value_set.clone(),
                        values: lines,
                    },
                )?)
            }
            None => None,
        };
        self.templates.render(
            TemplateName::PropertyDeclaration,
            &PropertyBindings {
                name: prop.name.clone(),
                uri: prop.uri.clone(),
                use_type: prop.use_type.clone(),
                strength: prop.ownership.as_str().to_string(),
                comment,
            },
        )
    }
}

#[allow(clippy::expect_used)]
fn id_placeholder_regex() -> &'static Regex {
    static ID_PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    // Constant pattern; cannot fail to compile.
    ID_PLACEHOLDER.get_or_init(|| Regex::new(r"\{\w+_id\}").expect("valid id placeholder regex"))
}

/// Rewrites every `{<word>_id}` placeholder except `{record_id}` to `{uuid}`.
///
/// `/records/{record_id}/allergies/{allergy_id}` → `/records/{record_id}/allergies/{uuid}`
pub fn normalize_base_path(path: &str) -> String {
    let record = format!("{{{RECORD_ID}}}");
    id_placeholder_regex()
        .replace_all(path, |caps: &Captures<'_>| {
            if caps[0] == record {
                record.clone()
            } else {
                "{uuid}".to_string()
            }
        })
        .into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use smart_ontology::model::iris::SP_CODES;
    use smart_ontology::{CodedValue, DataProperty, Enumeration, ObjectProperty};

    use super::*;
    use crate::template::UnboundPlaceholders;

    fn templates() -> TemplateSet {
        TemplateSet::from_texts(
            [
                (TemplateName::PropertyDeclaration, "{{ PROPERTY_STRENGTH }} {{ PROPERTY_TYPE }} *{{ PROPERTY_NAME }};{{ PROPERTY_COMMENT }}".to_string()),
                (TemplateName::GetterSingleObject, "one-object {{ PROPERTY_NAME }}".to_string()),
                (TemplateName::GetterMultiObject, "many-objects {{ PROPERTY_NAME }} of {{ ITEM_TYPE }}".to_string()),
                (TemplateName::GetterSingleLiteral, "one-literal {{ PROPERTY_NAME }}".to_string()),
                (TemplateName::GetterMultiLiteral, "many-literals {{ PROPERTY_NAME }}".to_string()),
                (TemplateName::BasePathAccessor, "path {{ BASE_PATH }}".to_string()),
                (TemplateName::CodedValuesComment, " // {{ CODED_VALUES }}".to_string()),
                (TemplateName::UnitTestAssertion, "assert {{ PROPERTY_NAME }} is {{ PROPERTY_TYPE }}".to_string()),
                (TemplateName::ForwardDeclaration, "@class {{ CLASS_NAMES }};".to_string()),
                (TemplateName::ClassHeader, "{{ CLASS_FORWARDS }}|{{ CLASS_NAME }}:{{ CLASS_SUPERCLASS }}".to_string()),
            ],
            UnboundPlaceholders::Reject,
        )
    }

    fn object(name: &str, target: ClassId, multiple: bool) -> ObjectProperty {
        ObjectProperty {
            name: name.to_string(),
            uri: format!("http://smartplatforms.org/terms#{name}"),
            multiple_cardinality: multiple,
            to_class: Some(target),
        }
    }

    fn data(name: &str, multiple: bool) -> DataProperty {
        DataProperty {
            name: name.to_string(),
            uri: format!("http://smartplatforms.org/terms#{name}"),
            multiple_cardinality: multiple,
        }
    }

    #[test]
    fn base_path_ids_become_uuid() {
        assert_eq!(
            normalize_base_path("/records/{record_id}/allergies/{allergy_id}"),
            "/records/{record_id}/allergies/{uuid}"
        );
        assert_eq!(
            normalize_base_path("/records/{record_id}/medications/{medication_id}/fulfillments/{fulfillment_id}"),
            "/records/{record_id}/medications/{uuid}/fulfillments/{uuid}"
        );
        assert_eq!(normalize_base_path("/records/{record_id}"), "/records/{record_id}");
    }

    #[test]
    fn empty_class_yields_minimal_descriptor() {
        let mut ontology = Ontology::default();
        let id = ontology.push(OntologyClass::new("Name", "http://smartplatforms.org/terms#Name"));
        let config = GeneratorConfig::default();
        let templates = templates();
        let builder = DescriptorBuilder::new(&ontology, &config, &templates);

        let mut session = Session::new();
        let descriptor = builder.build(id, &mut session).unwrap().unwrap();
        assert_eq!(descriptor.class_name, "SMName");
        assert_eq!(descriptor.superclass_name, "SMObject");
        assert!(descriptor.properties.is_empty());
        assert!(descriptor.forward_declarations.is_empty());
        assert!(descriptor.base_path_accessor.is_none());

        let (header, _) = descriptor
            .render_files(&templates, &FileMetadata::default())
            .unwrap();
        assert_eq!(header, "|SMName:SMObject");
    }

    #[test]
    fn properties_sorted_and_typed() {
        let mut ontology = Ontology::default();
        let record = ontology.push(OntologyClass::new(
            "MedicalRecord",
            "http://smartplatforms.org/terms#MedicalRecord",
        ));
        let mut problem = OntologyClass::new("Problem", "http://smartplatforms.org/terms#Problem");
        problem.base_path = Some("/records/{record_id}/problems/{problem_id}".to_string());
        problem.object_properties.push(object("belongsTo", record, false));
        problem.object_properties.push(object("encounters", record, true));
        problem.data_properties.push(data("start_date", false));
        problem.data_properties.push(data("notes", true));
        let id = ontology.push(problem);

        let config = GeneratorConfig::default();
        let templates = templates();
        let builder = DescriptorBuilder::new(&ontology, &config, &templates);
        let mut session = Session::new();
        let d = builder.build(id, &mut session).unwrap().unwrap();

        assert_eq!(d.superclass_name, "SMDocument");
        let names: Vec<_> = d.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["belongsTo", "encounters", "notes", "startDate"]);
        assert_eq!(
            d.property_declarations,
            vec![
                "strong SMMedicalRecord *belongsTo;",
                "copy NSArray *encounters;",
                "copy NSArray *notes;",
                "copy NSString *startDate;",
            ]
        );
        assert_eq!(
            d.accessor_bodies,
            vec![
                "one-object belongsTo",
                "many-objects encounters of SMMedicalRecord",
                "many-literals notes",
                "one-literal startDate",
            ]
        );
        assert_eq!(
            d.forward_declarations.iter().collect::<Vec<_>>(),
            vec!["SMMedicalRecord"]
        );
        assert_eq!(
            d.base_path_accessor.as_deref(),
            Some("path /records/{record_id}/problems/{uuid}")
        );

        let pending = session.take_pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].class_name, "SMMedicalRecord");
    }

    #[test]
    fn cyclic_references_build_each_class_once() {
        let mut ontology = Ontology::default();
        let a = ontology.push(OntologyClass::new("A", "http://example.org/A"));
        let b = ontology.push(OntologyClass::new("B", "http://example.org/B"));
        ontology.classes[a.0].object_properties.push(object("partner", b, false));
        ontology.classes[b.0].object_properties.push(object("partner", a, false));

        let config = GeneratorConfig::default();
        let templates = templates();
        let builder = DescriptorBuilder::new(&ontology, &config, &templates);
        let mut session = Session::new();

        let built_a = builder.build(a, &mut session).unwrap().unwrap();
        let pending = session.take_pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].class_name, "SMB");
        assert_eq!(
            pending[0].forward_declarations.iter().collect::<Vec<_>>(),
            vec!["SMA"]
        );
        assert_eq!(built_a.properties[0].target_type, "SMB");

        assert!(builder.build(b, &mut session).unwrap().is_none());
        assert!(builder.build(a, &mut session).unwrap().is_none());
        assert!(session.take_pending().is_empty());
    }

    #[test]
    fn coded_targets_collapse_with_valid_values() {
        let mut ontology = Ontology::default();
        ontology.push(OntologyClass::new(
            "CodedValue",
            "http://smartplatforms.org/terms#CodedValue",
        ));
        let mut severity = OntologyClass::new(
            "AllergySeverity",
            "http://smartplatforms.org/terms/codes/AllergySeverity",
        );
        severity.equivalent_classes = Some(Enumeration {
            one_of: vec![
                CodedValue {
                    uri: "http://snomed.info/id/255604002".to_string(),
                    title: "Mild".to_string(),
                },
                CodedValue {
                    uri: "http://snomed.info/id/24484000".to_string(),
                    title: "Severe".to_string(),
                },
            ],
        });
        let severity = ontology.push(severity);
        let mut allergy = OntologyClass::new("Allergy", "http://smartplatforms.org/terms#Allergy");
        allergy.object_properties.push(object("severity", severity, false));
        let allergy = ontology.push(allergy);

        let config = GeneratorConfig::default();
        let templates = templates();
        let builder = DescriptorBuilder::new(&ontology, &config, &templates);
        let mut session = Session::new();

        assert!(builder.build(severity, &mut session).unwrap().is_none());
        let d = builder.build(allergy, &mut session).unwrap().unwrap();
        assert_eq!(d.properties[0].target_type, "SMCodedValue");
        assert_eq!(
            d.property_declarations[0],
            "strong SMCodedValue *severity; // http://snomed.info/id/24484000  (Severe)\n\
             http://snomed.info/id/255604002  (Mild)"
        );
        assert!(session.take_pending().is_empty());
    }

    #[test]
    fn excluded_targets_are_omitted() {
        let mut ontology = Ontology::default();
        let hidden = ontology.push(OntologyClass::new("Hidden", "http://example.org/Hidden"));
        let mut owner = OntologyClass::new("Owner", "http://example.org/Owner");
        owner.object_properties.push(object("hidden", hidden, false));
        owner.object_properties.push(ObjectProperty {
            name: "dangling".to_string(),
            uri: "http://example.org/dangling".to_string(),
            multiple_cardinality: false,
            to_class: None,
        });
        owner.data_properties.push(data("label", false));
        let owner = ontology.push(owner);

        let config = GeneratorConfig {
            ignore_uris: vec!["http://example.org/Hidden".to_string()],
            ..GeneratorConfig::default()
        };
        let templates = templates();
        let builder = DescriptorBuilder::new(&ontology, &config, &templates);
        let mut session = Session::new();

        let d = builder.build(owner, &mut session).unwrap().unwrap();
        let names: Vec<_> = d.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["label"]);
        assert_eq!(session.known("http://example.org/Hidden"), Some(&Resolved::Excluded));
        assert!(builder.build(hidden, &mut session).unwrap().is_none());
    }

    #[test]
    fn codes_root_is_excluded_not_collapsed() {
        let mut ontology = Ontology::default();
        let root = ontology.push(OntologyClass::new("codes", SP_CODES));
        let mut owner = OntologyClass::new("Owner", "http://smartplatforms.org/terms#Owner");
        owner.object_properties.push(object("code_set", root, false));
        owner.data_properties.push(data("label", false));
        let owner = ontology.push(owner);

        let config = GeneratorConfig::default();
        assert_eq!(config.reserved_namespaces, vec![config.codes_namespace.clone()]);
        let templates = templates();
        let builder = DescriptorBuilder::new(&ontology, &config, &templates);
        let mut session = Session::new();

        assert!(builder.build(root, &mut session).unwrap().is_none());
        assert_eq!(session.known(SP_CODES), Some(&Resolved::Excluded));
        assert!(session.valid_values(SP_CODES).is_none());

        let d = builder.build(owner, &mut session).unwrap().unwrap();
        let names: Vec<_> = d.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["label"]);
        assert!(!d.forward_declarations.contains("SMCodedValue"));
    }

    #[test]
    fn clashing_class_names_keep_the_first_class() {
        let mut ontology = Ontology::default();
        let first = ontology.push(OntologyClass::new(
            "allergy_status",
            "http://smartplatforms.org/terms#allergy_status",
        ));
        let mut second = OntologyClass::new("AllergyStatus", "http://example.org/other#AllergyStatus");
        second.data_properties.push(data("note", false));
        let second = ontology.push(second);
        let mut owner = OntologyClass::new("Owner", "http://example.org/Owner");
        owner.object_properties.push(object("status", second, false));
        let owner = ontology.push(owner);

        let config = GeneratorConfig::default();
        let templates = templates();
        let builder = DescriptorBuilder::new(&ontology, &config, &templates);
        let mut session = Session::new();

        let d = builder.build(first, &mut session).unwrap().unwrap();
        assert_eq!(d.class_name, "SMAllergyStatus");
        assert!(builder.build(second, &mut session).unwrap().is_none());
        assert_eq!(
            session.known("http://example.org/other#AllergyStatus"),
            Some(&Resolved::Excluded)
        );
        assert_eq!(
            session.name_owner("SMAllergyStatus"),
            Some("http://smartplatforms.org/terms#allergy_status")
        );

        let d = builder.build(owner, &mut session).unwrap().unwrap();
        assert!(d.properties.is_empty());
        assert!(session.take_pending().is_empty());
    }

    #[test]
    fn deprecated_name_exclusion_still_applies() {
        let mut ontology = Ontology::default();
        let id = ontology.push(OntologyClass::new("Component", "http://example.org/Component"));
        let config = GeneratorConfig {
            ignore_names: vec!["Component".to_string()],
            ..GeneratorConfig::default()
        };
        let templates = templates();
        let builder = DescriptorBuilder::new(&ontology, &config, &templates);
        assert!(builder.build(id, &mut Session::new()).unwrap().is_none());
    }

    #[test]
    fn examples_produce_one_assertion_per_property() {
        let mut ontology = Ontology::default();
        let mut name = OntologyClass::new("Name", "http://smartplatforms.org/terms#Name");
        name.data_properties.push(data("given_name", false));
        name.data_properties.push(data("family_name", false));
        name.example = Some("<rdf:RDF/>".to_string());
        let id = ontology.push(name);

        let config = GeneratorConfig::default();
        let templates = templates();
        let builder = DescriptorBuilder::new(&ontology, &config, &templates);
        let d = builder.build(id, &mut Session::new()).unwrap().unwrap();

        assert_eq!(d.example_payload.as_deref(), Some("<rdf:RDF/>"));
        assert_eq!(
            d.unit_test_assertions,
            vec![
                "assert familyName is NSString",
                "assert givenName is NSString"
            ]
        );
    }

    #[test]
    fn calls_are_collected_into_session() {
        use smart_ontology::{ApiCall, CallCategory, HttpMethod};

        let mut ontology = Ontology::default();
        let mut allergy = OntologyClass::new("Allergy", "http://smartplatforms.org/terms#Allergy");
        for path in [
            "/records/{record_id}/allergies/",
            "/records/{record_id}/allergies/{allergy_id}",
        ] {
            allergy.calls.push(ApiCall {
                path: path.to_string(),
                category: CallCategory::Record,
                http_method: HttpMethod::Get,
                description: String::new(),
                name: None,
            });
        }
        let id = ontology.push(allergy);

        let config = GeneratorConfig::default();
        let templates = templates();
        let builder = DescriptorBuilder::new(&ontology, &config, &templates);
        let mut session = Session::new();
        builder.build(id, &mut session).unwrap();

        let record_calls = session.drain_record_calls();
        assert_eq!(record_calls.len(), 1);
        assert_eq!(record_calls[0].method_name, "getAllergies");
        assert_eq!(session.item_calls().len(), 1);
        assert!(session.other_calls().is_empty());
    }
}
