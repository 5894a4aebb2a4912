//! A minimal RDF graph and its Turtle, N-Triples, JSON-LD and RDF/XML writers.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::Cursor;

use bytes::Bytes;
use profile_negotiation::{media_types, SerializationError};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::{json, Map, Value};

/// Namespaces used by the shipped graphs.
pub mod ns {
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const DCTERMS: &str = "http://purl.org/dc/terms/";
    pub const GEO: &str = "http://www.opengis.net/ont/geosparql#";
    pub const GEOX: &str = "https://linked.data.gov.au/def/geox#";
    pub const SU: &str = "https://linked.data.gov.au/def/su/";
    pub const ISC: &str = "http://resource.geosciml.org/classifier/ics/ischart/";
    pub const QUDT: &str = "http://qudt.org/schema/qudt/";
    pub const SUH: &str = "http://pid.geoscience.gov.au/def/voc/stratigraphichierarchy/";
    pub const GSOC: &str = "http://loop3d.org/GSO/ontology/2020/1/common/";
    pub const GSOG: &str = "http://loop3d.org/GSO/ontology/2020/1/geologicfeature/";
    pub const GSPR: &str = "http://loop3d.org/GSO/ontology/2020/1/geologicprocess/";
    pub const LUNIT: &str = "http://loop3d.org/GSO/ontology/2020/1/uom/";
    pub const EP: &str = "http://resource.geosciml.org/classifier/cgi/eventprocess/";
}

/// An RDF term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Iri(String),
    Blank(String),
    Literal {
        value: String,
        datatype: Option<String>,
    },
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// A plain string literal.
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: None,
        }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: Some(datatype.into()),
        }
    }

    /// An `xsd:float` literal.
    pub fn float(value: f64) -> Self {
        Term::typed(format_float(value), format!("{}float", ns::XSD))
    }
}

/// A subject, predicate, object statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

/// An ordered set of triples with prefix bindings.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    prefixes: Vec<(String, String)>,
    triples: Vec<Triple>,
    blank_count: usize,
}

impl Graph {
    pub fn new() -> Self {
        let mut graph = Self::default();
        graph.bind("rdf", ns::RDF);
        graph.bind("xsd", ns::XSD);
        graph
    }

    /// Bind a prefix. Rebinding a prefix replaces its namespace.
    pub fn bind(&mut self, prefix: &str, namespace: &str) -> &mut Self {
        match self.prefixes.iter_mut().find(|(p, _)| p == prefix) {
            Some(entry) => entry.1 = namespace.to_string(),
            None => self
                .prefixes
                .push((prefix.to_string(), namespace.to_string())),
        }
        self
    }

    /// A fresh blank node.
    pub fn blank(&mut self) -> Term {
        let term = Term::Blank(format!("b{}", self.blank_count));
        self.blank_count += 1;
        term
    }

    /// Add a statement. Duplicates are ignored.
    pub fn add(&mut self, subject: Term, predicate: impl Into<String>, object: Term) -> &mut Self {
        let triple = Triple {
            subject,
            predicate: predicate.into(),
            object,
        };
        if !self.triples.contains(&triple) {
            self.triples.push(triple);
        }
        self
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn contains(&self, subject: &Term, predicate: &str, object: &Term) -> bool {
        self.triples
            .iter()
            .any(|t| &t.subject == subject && t.predicate == predicate && &t.object == object)
    }

    /// Objects of every statement with the given subject and predicate.
    pub fn objects<'a>(
        &'a self,
        subject: &'a Term,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject && t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// Serialize in one of the RDF media types.
    ///
    /// `application/json` is answered with JSON-LD.
    pub fn serialize(&self, media_type: &str) -> Result<Bytes, SerializationError> {
        let body = match media_type {
            media_types::TURTLE => self.to_turtle().into_bytes(),
            media_types::N_TRIPLES => self.to_ntriples().into_bytes(),
            media_types::JSON_LD | media_types::JSON => serde_json::to_vec_pretty(&self.to_json_ld())
                .map_err(|e| SerializationError::encoding(media_type, e))?,
            media_types::RDF_XML => self.to_rdf_xml()?,
            other => {
                return Err(SerializationError::encoding(
                    other,
                    "not an RDF serialization",
                ))
            }
        };
        Ok(Bytes::from(body))
    }

    /// Subjects in first-appearance order with their statements.
    fn by_subject(&self) -> Vec<(&Term, Vec<&Triple>)> {
        let mut order: Vec<&Term> = Vec::new();
        let mut groups: HashMap<&Term, Vec<&Triple>> = HashMap::new();
        for triple in &self.triples {
            groups
                .entry(&triple.subject)
                .or_insert_with(|| {
                    order.push(&triple.subject);
                    Vec::new()
                })
                .push(triple);
        }
        order
            .into_iter()
            .map(|s| (s, groups.remove(s).unwrap_or_default()))
            .collect()
    }

    /// Compact an IRI to `prefix:local` when the local part is a safe name.
    fn compact(&self, iri: &str) -> Option<String> {
        self.prefixes
            .iter()
            .filter(|(_, namespace)| iri.starts_with(namespace.as_str()))
            .max_by_key(|(_, namespace)| namespace.len())
            .and_then(|(prefix, namespace)| {
                let local = &iri[namespace.len()..];
                is_pname_local(local).then(|| format!("{}:{}", prefix, local))
            })
    }

    fn turtle_iri(&self, iri: &str) -> String {
        self.compact(iri).unwrap_or_else(|| format!("<{}>", iri))
    }

    fn turtle_term(&self, term: &Term) -> String {
        match term {
            Term::Iri(iri) => self.turtle_iri(iri),
            Term::Blank(id) => format!("_:{}", id),
            Term::Literal { value, datatype } => match datatype {
                Some(datatype) => format!("\"{}\"^^{}", escape_literal(value), self.turtle_iri(datatype)),
                None => format!("\"{}\"", escape_literal(value)),
            },
        }
    }

    /// Turtle with prefix declarations, statements grouped by subject.
    pub fn to_turtle(&self) -> String {
        let mut out = String::new();
        for (prefix, namespace) in &self.prefixes {
            let _ = writeln!(out, "@prefix {}: <{}> .", prefix, namespace);
        }

        let rdf_type = format!("{}type", ns::RDF);
        for (subject, triples) in self.by_subject() {
            out.push('\n');
            out.push_str(&self.turtle_term(subject));
            for (i, triple) in triples.iter().enumerate() {
                let predicate = if triple.predicate == rdf_type {
                    "a".to_string()
                } else {
                    self.turtle_iri(&triple.predicate)
                };
                let separator = if i == 0 { " " } else { " ;\n    " };
                let _ = write!(
                    out,
                    "{}{} {}",
                    separator,
                    predicate,
                    self.turtle_term(&triple.object)
                );
            }
            out.push_str(" .\n");
        }
        out
    }

    /// One statement per line with full IRIs.
    pub fn to_ntriples(&self) -> String {
        let mut out = String::new();
        for triple in &self.triples {
            let _ = writeln!(
                out,
                "{} <{}> {} .",
                ntriples_term(&triple.subject),
                triple.predicate,
                ntriples_term(&triple.object)
            );
        }
        out
    }

    /// Expanded JSON-LD: one node object per subject, with the prefixes as context.
    pub fn to_json_ld(&self) -> Value {
        let rdf_type = format!("{}type", ns::RDF);
        let context: Map<String, Value> = self
            .prefixes
            .iter()
            .map(|(prefix, namespace)| (prefix.clone(), Value::String(namespace.clone())))
            .collect();

        let nodes: Vec<Value> = self
            .by_subject()
            .into_iter()
            .map(|(subject, triples)| {
                let mut node = Map::new();
                node.insert("@id".to_string(), Value::String(node_id(subject)));
                for triple in triples {
                    if triple.predicate == rdf_type {
                        if let Term::Iri(class) = &triple.object {
                            push_value(&mut node, "@type", Value::String(class.clone()));
                            continue;
                        }
                    }
                    push_value(&mut node, &triple.predicate, json_ld_object(&triple.object));
                }
                Value::Object(node)
            })
            .collect();

        json!({
            "@context": context,
            "@graph": nodes,
        })
    }

    /// RDF/XML with one `rdf:Description` per subject.
    pub fn to_rdf_xml(&self) -> Result<Vec<u8>, SerializationError> {
        let encoding_error = |e: quick_xml::Error| SerializationError::encoding(media_types::RDF_XML, e);

        // Every predicate must be written as a QName, so namespaces that
        // are not bound get generated prefixes.
        let mut namespaces: Vec<(String, String)> = self.prefixes.clone();
        let mut qnames: HashMap<&str, String> = HashMap::new();
        for triple in &self.triples {
            if qnames.contains_key(triple.predicate.as_str()) {
                continue;
            }
            let (namespace, local) = split_iri(&triple.predicate).ok_or_else(|| {
                SerializationError::encoding(
                    media_types::RDF_XML,
                    format!("predicate <{}> cannot be written as an XML name", triple.predicate),
                )
            })?;
            let prefix = match namespaces.iter().find(|(_, n)| n == namespace) {
                Some((prefix, _)) => prefix.clone(),
                None => {
                    let prefix = format!("ns{}", namespaces.len());
                    namespaces.push((prefix.clone(), namespace.to_string()));
                    prefix
                }
            };
            qnames.insert(&triple.predicate, format!("{}:{}", prefix, local));
        }

        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(encoding_error)?;

        let mut root = BytesStart::new("rdf:RDF");
        for (prefix, namespace) in &namespaces {
            root.push_attribute((format!("xmlns:{}", prefix).as_str(), namespace.as_str()));
        }
        writer.write_event(Event::Start(root)).map_err(encoding_error)?;

        for (subject, triples) in self.by_subject() {
            let mut description = BytesStart::new("rdf:Description");
            match subject {
                Term::Blank(id) => description.push_attribute(("rdf:nodeID", id.as_str())),
                Term::Iri(iri) => description.push_attribute(("rdf:about", iri.as_str())),
                Term::Literal { .. } => {
                    return Err(SerializationError::encoding(
                        media_types::RDF_XML,
                        "literal in subject position",
                    ))
                }
            }
            writer
                .write_event(Event::Start(description))
                .map_err(encoding_error)?;

            for triple in triples {
                let qname = qnames
                    .get(triple.predicate.as_str())
                    .map(String::as_str)
                    .unwrap_or_default();
                let mut property = BytesStart::new(qname);
                match &triple.object {
                    Term::Iri(iri) => {
                        property.push_attribute(("rdf:resource", iri.as_str()));
                        writer.write_event(Event::Empty(property)).map_err(encoding_error)?;
                    }
                    Term::Blank(id) => {
                        property.push_attribute(("rdf:nodeID", id.as_str()));
                        writer.write_event(Event::Empty(property)).map_err(encoding_error)?;
                    }
                    Term::Literal { value, datatype } => {
                        if let Some(datatype) = datatype {
                            property.push_attribute(("rdf:datatype", datatype.as_str()));
                        }
                        writer.write_event(Event::Start(property)).map_err(encoding_error)?;
                        writer
                            .write_event(Event::Text(BytesText::new(value)))
                            .map_err(encoding_error)?;
                        writer
                            .write_event(Event::End(BytesEnd::new(qname)))
                            .map_err(encoding_error)?;
                    }
                }
            }

            writer
                .write_event(Event::End(BytesEnd::new("rdf:Description")))
                .map_err(encoding_error)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("rdf:RDF")))
            .map_err(encoding_error)?;

        Ok(writer.into_inner().into_inner())
    }
}

fn push_value(node: &mut Map<String, Value>, key: &str, value: Value) {
    match node.get_mut(key) {
        Some(Value::Array(values)) => values.push(value),
        _ => {
            node.insert(key.to_string(), Value::Array(vec![value]));
        }
    }
}

fn node_id(term: &Term) -> String {
    match term {
        Term::Iri(iri) => iri.clone(),
        Term::Blank(id) => format!("_:{}", id),
        Term::Literal { value, .. } => value.clone(),
    }
}

fn json_ld_object(term: &Term) -> Value {
    match term {
        Term::Iri(_) | Term::Blank(_) => json!({ "@id": node_id(term) }),
        Term::Literal {
            value,
            datatype: Some(datatype),
        } => json!({ "@value": value, "@type": datatype }),
        Term::Literal {
            value,
            datatype: None,
        } => json!({ "@value": value }),
    }
}

fn ntriples_term(term: &Term) -> String {
    match term {
        Term::Iri(iri) => format!("<{}>", iri),
        Term::Blank(id) => format!("_:{}", id),
        Term::Literal {
            value,
            datatype: Some(datatype),
        } => format!("\"{}\"^^<{}>", escape_literal(value), datatype),
        Term::Literal {
            value,
            datatype: None,
        } => format!("\"{}\"", escape_literal(value)),
    }
}

fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn is_pname_local(local: &str) -> bool {
    !local.is_empty()
        && !local.ends_with('.')
        && !local.starts_with(['-', '.'])
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Split an IRI into namespace and an XML-safe local name.
fn split_iri(iri: &str) -> Option<(&str, &str)> {
    let index = iri.rfind(['#', '/'])? + 1;
    let (namespace, local) = iri.split_at(index);
    let mut chars = local.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    chars
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .then_some((namespace, local))
}

/// Floats always carry a decimal point or exponent so they read back as floats.
fn format_float(value: f64) -> String {
    let formatted = value.to_string();
    if formatted.contains(['.', 'e', 'E']) || !value.is_finite() {
        formatted
    } else {
        format!("{}.0", formatted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT: &str = "https://pid.geoscience.gov.au/def/stratname/ga/SU12345";

    fn sample() -> Graph {
        let mut g = Graph::new();
        g.bind("geo", ns::GEO).bind("dcterms", ns::DCTERMS);
        let unit = Term::iri(UNIT);
        let bound = g.blank();
        g.add(unit.clone(), format!("{}type", ns::RDF), Term::iri(format!("{}Feature", ns::GEO)))
            .add(unit.clone(), format!("{}title", ns::DCTERMS), Term::literal("Mulga \"Downs\" Group"))
            .add(unit, format!("{}youngerBound", ns::SU), bound.clone())
            .add(bound, format!("{}value", ns::QUDT), Term::float(359_200_000.0));
        g
    }

    #[test]
    fn test_add_ignores_duplicates() {
        let mut g = Graph::new();
        g.add(Term::iri(UNIT), "http://example.com/p", Term::literal("x"));
        g.add(Term::iri(UNIT), "http://example.com/p", Term::literal("x"));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_turtle() {
        let turtle = sample().to_turtle();
        assert!(turtle.contains("@prefix geo: <http://www.opengis.net/ont/geosparql#> ."));
        assert!(turtle.contains(&format!("<{}> a geo:Feature ;", UNIT)));
        assert!(turtle.contains("dcterms:title \"Mulga \\\"Downs\\\" Group\""));
        // su: is not bound, so the predicate stays a full IRI
        assert!(turtle.contains("<https://linked.data.gov.au/def/su/youngerBound> _:b0 ."));
        assert!(turtle.contains("_:b0 <http://qudt.org/schema/qudt/value> \"359200000.0\"^^xsd:float ."));
    }

    #[test]
    fn test_ntriples() {
        let nt = sample().to_ntriples();
        let lines: Vec<&str> = nt.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            format!(
                "<{}> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.opengis.net/ont/geosparql#Feature> .",
                UNIT
            )
        );
        assert!(lines[3].ends_with("\"359200000.0\"^^<http://www.w3.org/2001/XMLSchema#float> ."));
    }

    #[test]
    fn test_json_ld() {
        let doc = sample().to_json_ld();
        assert_eq!(doc["@context"]["geo"], ns::GEO);

        let nodes = doc["@graph"].as_array().unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0]["@id"], UNIT);
        assert_eq!(nodes[0]["@type"][0], "http://www.opengis.net/ont/geosparql#Feature");
        assert_eq!(
            nodes[0]["http://purl.org/dc/terms/title"][0]["@value"],
            "Mulga \"Downs\" Group"
        );
        assert_eq!(
            nodes[0]["https://linked.data.gov.au/def/su/youngerBound"][0]["@id"],
            "_:b0"
        );
        assert_eq!(nodes[1]["@id"], "_:b0");
    }

    #[test]
    fn test_rdf_xml() {
        let xml = String::from_utf8(sample().to_rdf_xml().unwrap()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("xmlns:geo=\"http://www.opengis.net/ont/geosparql#\""));
        assert!(xml.contains(&format!("<rdf:Description rdf:about=\"{}\">", UNIT)));
        assert!(xml.contains("<rdf:type rdf:resource=\"http://www.opengis.net/ont/geosparql#Feature\"/>"));
        assert!(xml.contains("<dcterms:title>Mulga &quot;Downs&quot; Group</dcterms:title>"));
        // Unbound namespaces get generated prefixes
        assert!(xml.contains("xmlns:ns4=\"https://linked.data.gov.au/def/su/\""));
        assert!(xml.contains("<ns4:youngerBound rdf:nodeID=\"b0\"/>"));
    }

    #[test]
    fn test_rdf_xml_rejects_unsplittable_predicate() {
        let mut g = Graph::new();
        g.add(Term::iri(UNIT), "http://example.com/1234", Term::literal("x"));
        assert!(matches!(
            g.to_rdf_xml(),
            Err(SerializationError::Encoding { .. })
        ));
    }

    #[test]
    fn test_serialize_dispatches_on_media_type() {
        let g = sample();
        let json = g.serialize("application/json").unwrap();
        let ld = g.serialize("application/ld+json").unwrap();
        assert_eq!(json, ld);
        assert!(g.serialize("text/html").is_err());
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(359_200_000.0), "359200000.0");
        assert_eq!(format_float(1.25), "1.25");
    }
}
