//! RDF graphs of an entity under the GeoSPARQL, Stratigraphic Units and
//! Loop3D profiles.

use crate::entity::{AgeBound, Entity, StratUnitProperties, UOM_MA};

use super::rdf::{ns, Graph, Term};

fn iri(namespace: &str, local: &str) -> String {
    format!("{}{}", namespace, local)
}

fn rdf_type() -> String {
    iri(ns::RDF, "type")
}

/// The entity as a `geo:Feature` with membership, label and geometry.
pub fn geosp_graph(entity: &Entity) -> Graph {
    let mut g = Graph::new();
    g.bind("geo", ns::GEO)
        .bind("geox", ns::GEOX)
        .bind("dcterms", ns::DCTERMS);

    let f = Term::iri(&entity.uri);
    g.add(f.clone(), rdf_type(), Term::iri(iri(ns::GEO, "Feature")));
    g.add(
        f.clone(),
        iri(ns::DCTERMS, "identifier"),
        Term::literal(&entity.id),
    );
    g.add(
        f.clone(),
        iri(ns::DCTERMS, "title"),
        Term::literal(&entity.title),
    );
    if let Some(ref description) = entity.description {
        g.add(
            f.clone(),
            iri(ns::DCTERMS, "description"),
            Term::literal(description),
        );
    }
    if let Some(ref dataset) = entity.is_part_of {
        g.add(f.clone(), iri(ns::DCTERMS, "isPartOf"), Term::iri(dataset));
    }
    if let Some(ref geometry) = entity.geometry {
        let node = g.blank();
        g.add(f, iri(ns::GEO, "hasGeometry"), node.clone());
        g.add(node.clone(), rdf_type(), Term::iri(iri(ns::GEO, "Geometry")));
        g.add(
            node,
            iri(ns::GEO, "asWKT"),
            Term::typed(&geometry.wkt, iri(ns::GEO, "wktLiteral")),
        );
    }
    g
}

/// The GeoSPARQL graph extended with the unit's Stratigraphic Units properties.
pub fn su_graph(entity: &Entity) -> Graph {
    let mut g = geosp_graph(entity);
    g.bind("su", ns::SU)
        .bind("isc", ns::ISC)
        .bind("qudt", ns::QUDT)
        .bind("suh", ns::SUH);

    let Some(ref unit) = entity.unit else {
        return g;
    };
    let f = Term::iri(&entity.uri);

    let properties = [
        ("observationMethod", &unit.observation_method),
        ("geologicUnitType", &unit.geologic_unit_type),
        ("descriptionPurpose", &unit.description_purpose),
        ("stratigraphicRank", &unit.stratigraphic_rank),
    ];
    for (predicate, value) in properties {
        if let Some(value) = value {
            g.add(f.clone(), iri(ns::SU, predicate), Term::iri(value));
        }
    }

    if unit.has_history() {
        let history = g.blank();
        g.add(f.clone(), iri(ns::SU, "geologicHistory"), history.clone());

        if let Some(ref process) = unit.event_process {
            g.add(history.clone(), iri(ns::SU, "eventProcess"), Term::iri(process));
        }
        if let Some(ref bound) = unit.younger_bound {
            let quantity = add_quantity(&mut g, bound);
            g.add(history.clone(), iri(ns::SU, "youngerBound"), quantity);
        }
        if let Some(ref bound) = unit.older_bound {
            let quantity = add_quantity(&mut g, bound);
            g.add(history.clone(), iri(ns::SU, "olderBound"), quantity);
        }
        if let Some(ref age) = unit.younger_named_age {
            g.add(history.clone(), iri(ns::SU, "youngerNamedAge"), Term::iri(age));
        }
        if let Some(ref age) = unit.older_named_age {
            g.add(history, iri(ns::SU, "olderNamedAge"), Term::iri(age));
        }
    }

    for link in &unit.hierarchy_links {
        g.add(f.clone(), link.role.clone(), Term::iri(&link.target_unit));
    }

    g
}

fn add_quantity(g: &mut Graph, bound: &AgeBound) -> Term {
    let (value, unit) = bound.as_quantity();
    let node = g.blank();
    g.add(node.clone(), rdf_type(), Term::iri(iri(ns::QUDT, "Quantity")));
    g.add(node.clone(), iri(ns::QUDT, "value"), Term::float(value));
    g.add(node.clone(), iri(ns::QUDT, "units"), Term::iri(unit));
    node
}

/// The unit as a Loop3D `gsog:Group` taking part in a geologic event.
pub fn loop3d_graph(entity: &Entity) -> Graph {
    let mut g = Graph::new();
    g.bind("gsoc", ns::GSOC)
        .bind("gsog", ns::GSOG)
        .bind("gspr", ns::GSPR);

    let f = Term::iri(&entity.uri);
    g.add(f.clone(), rdf_type(), Term::iri(iri(ns::GSOG, "Group")));

    let Some(ref unit) = entity.unit else {
        return g;
    };
    if !unit.has_history() {
        return g;
    }

    g.bind("qudt", ns::QUDT).bind("lunit", ns::LUNIT);

    let event = g.blank();
    g.add(event.clone(), rdf_type(), Term::iri(iri(ns::GSOG, "Geologic_Event")));
    g.add(f, iri(ns::GSOC, "isParticipantIn"), event.clone());

    let process = g.blank();
    g.add(event.clone(), iri(ns::GSOC, "hasConstituent"), process.clone());
    g.add(process.clone(), rdf_type(), Term::iri(iri(ns::GSOG, "Geologic_Process")));
    if let Some(class) = unit.event_process.as_deref().and_then(gso_process_class) {
        g.add(process, rdf_type(), Term::iri(class));
    }

    if unit.has_age() {
        add_temporal_occupation(&mut g, &event, unit);
    }

    g
}

fn add_temporal_occupation(g: &mut Graph, event: &Term, unit: &StratUnitProperties) {
    let interval = g.blank();
    g.add(event.clone(), iri(ns::GSOC, "directTemporalOccupies"), interval.clone());

    if let Some(ref age) = unit.younger_named_age {
        g.add(interval.clone(), iri(ns::GSOC, "timeFinishedBy"), Term::iri(age));
    }
    if let Some(ref age) = unit.older_named_age {
        g.add(interval.clone(), iri(ns::GSOC, "timeStartedBy"), Term::iri(age));
    }

    if unit.younger_bound.is_none() && unit.older_bound.is_none() {
        return;
    }
    let range = g.blank();
    g.add(interval, iri(ns::GSOC, "hasValue"), range.clone());

    if let Some(ref bound) = unit.younger_bound {
        let value = add_time_value(g, bound);
        g.add(range.clone(), iri(ns::GSOC, "hasEndValue"), value);
    }
    if let Some(ref bound) = unit.older_bound {
        let value = add_time_value(g, bound);
        g.add(range, iri(ns::GSOC, "hasStartValue"), value);
    }
}

fn add_time_value(g: &mut Graph, bound: &AgeBound) -> Term {
    let node = g.blank();
    g.add(node.clone(), rdf_type(), Term::iri(iri(ns::GSOC, "Time_Numeric_Value")));
    g.add(node.clone(), rdf_type(), Term::iri(iri(ns::GSOC, "Geologic_Time_Date")));
    g.add(node.clone(), iri(ns::GSOG, "hasDataValue"), Term::float(bound.value));

    let uom = g.blank();
    g.add(node.clone(), iri(ns::GSOC, "hasUOM"), uom.clone());
    let uom_class = if bound.uom == UOM_MA {
        iri(ns::LUNIT, "ma")
    } else {
        bound.uom.clone()
    };
    g.add(uom, rdf_type(), Term::iri(uom_class));
    node
}

/// CGI event process local names and the GSO process classes they map to.
/// Some entries are the closest class rather than an exact match.
const EVENT_PROCESS_CLASSES: &[(&str, &str)] = &[
    ("accretion", "Accretion"),
    ("biological_precipitation", "Biological_Precipitation"),
    ("biological_weathering", "Biological_Weathering"),
    ("chemical_precipitation", "Chemical_Precipitation"),
    ("chemical_weathering", "Chemical_Weathering"),
    ("contact_metamorphism", "Contact_Metamorphism"),
    ("continental_breakup", "Continental_Breakup"),
    ("continental_collision", "Continental_Collision"),
    ("debris_flow_deposition", "Debris_Flow_Deposition"),
    ("deep_water_oxygen_depletion", "Deep_Water_Oxygen_Depletion"),
    ("deformation_twinning", "Deformation_Twinning"),
    ("deposition", "Deposition"),
    ("diagenetic_process", "Diagenetic_Process"),
    ("diffusion_creep", "Diffusion_Creep"),
    ("dislocation_metamorphism", "Dislocation_Metamorphism"),
    ("dissolution", "Dissolution"),
    ("dissolution_creep", "Dissolution_Creep"),
    ("ductile_flow", "Ductile_Flow"),
    ("effusive_eruption", "Effusive_Eruption"),
    ("erosion", "Erosion"),
    ("eruption", "Eruption"),
    ("excavation", "Excavation"),
    ("faulting", "Faulting"),
    ("folding", "Folding"),
    ("fracturing", "Fracturing"),
    ("frost_shattering", "Frost_Shattering"),
    ("geomagnetic_process", "Geomagnetic_Process"),
    ("grading", "Grading"),
    ("haloclasty", "Haloclasty"),
    ("hawaiian_eruption", "Hawaiian_Eruption"),
    ("human_activity", "Human_Deposition"),
    ("hydration", "Hydration"),
    ("hydrolysis", "Hydrolysis"),
    ("ice_erosion", "Ice_Erosion"),
    ("intrusion", "Intrusion_Process"),
    ("magmatic_crystallisation", "Magmatic_Cystallisation"),
    ("magmatic_process", "Magmatic_Process"),
    ("mass_wasting", "Mass_Wasting"),
    ("mass_wasting_deposition", "Mass_Wasting_Deposition"),
    ("mechanical_deposition", "Mechanical_Deposition"),
    ("melting", "Melting"),
    ("metamorphic_process", "Metamorphic_Process"),
    ("microfracturing", "Microfracturing"),
    ("obduction", "Obduction"),
    ("organic_accumulation", "Organic_Accumulation"),
    ("oxidation", "Oxidation"),
    ("partial_melting", "Partial_Melting"),
    ("physical_weathering", "Physical_Weathering"),
    ("plinian_eruption", "Plinian_Eruption"),
    ("polar_wander", "Polar_Wander"),
    ("pressure_release_weathering", "Pressure_Release_Weathering"),
    ("pyroclastic_eruption", "Pyroclastic_Eruption"),
    ("rifting", "Rifting"),
    ("sea_level_change", "Sea_Level_Fluctuation"),
    ("sedimentary_process", "Sedimentary_Process"),
    ("shearing", "Shearing"),
    ("spreading", "Spreading"),
    ("strombolian_eruption", "Strombolian_Eruption"),
    ("subduction", "Subduction"),
    ("tectonic_process", "Tectonic_Process"),
    ("thermal_shock_weathering", "Thermal_Shock_Weathering"),
    (
        "traction_saltation_or_suspension_deposition",
        "Traction_Saltation_or_Suspension_Deposition",
    ),
    ("transform_faulting", "Transform_Faulting"),
    ("turbidity_current_deposition", "Turbidity_Current_Deposition"),
    ("vulcanian_eruption", "Vulcanian_Eruption"),
    ("water_erosion", "Water_Erosion"),
    ("weathering", "Weathering"),
    ("wind_erosion", "Wind_Erosion"),
];

/// The GSO process class for a CGI event process URI, if one is mapped.
pub fn gso_process_class(event_process: &str) -> Option<String> {
    let local = event_process.strip_prefix(ns::EP)?;
    EVENT_PROCESS_CLASSES
        .iter()
        .find(|(ep, _)| *ep == local)
        .map(|(_, class)| iri(ns::GSPR, class))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Geometry, HierarchyLink, QUDT_UNIT_YEAR};

    const UNIT_URI: &str = "https://pid.geoscience.gov.au/def/stratname/ga/SU12345";

    fn unit() -> Entity {
        Entity {
            id: "12345".to_string(),
            uri: UNIT_URI.to_string(),
            title: "Mulga Downs Group".to_string(),
            description: None,
            is_part_of: Some("http://example.com/dataset/auststrat/sus".to_string()),
            geometry: None,
            unit: Some(StratUnitProperties {
                stratigraphic_rank: Some(
                    "http://resource.geosciml.org/classifier/cgi/stratigraphicrank/group".to_string(),
                ),
                event_process: Some(format!("{}deposition", ns::EP)),
                younger_bound: Some(AgeBound::new(359.2, UOM_MA)),
                older_bound: Some(AgeBound::new(382.7, UOM_MA)),
                older_named_age: Some(format!("{}Givetian", ns::ISC)),
                hierarchy_links: vec![HierarchyLink {
                    role: format!("{}isPartOf", ns::SUH),
                    target_unit: "https://pid.geoscience.gov.au/def/stratname/ga/SU1".to_string(),
                }],
                ..Default::default()
            }),
            source_xml: None,
        }
    }

    fn subject() -> Term {
        Term::iri(UNIT_URI)
    }

    fn single_object<'a>(g: &'a Graph, s: &Term, p: &str) -> &'a Term {
        let objects: Vec<&Term> = g
            .triples()
            .iter()
            .filter(|t| &t.subject == s && t.predicate == p)
            .map(|t| &t.object)
            .collect();
        assert_eq!(objects.len(), 1, "expected one {}", p);
        objects[0]
    }

    #[test]
    fn test_geosp_graph() {
        let mut entity = unit();
        entity.geometry = Some(Geometry {
            wkt: "POINT (120 -25)".to_string(),
            geojson: None,
        });
        let g = geosp_graph(&entity);

        assert!(g.contains(&subject(), &rdf_type(), &Term::iri(iri(ns::GEO, "Feature"))));
        assert!(g.contains(
            &subject(),
            &iri(ns::DCTERMS, "isPartOf"),
            &Term::iri("http://example.com/dataset/auststrat/sus")
        ));

        let geometry = single_object(&g, &subject(), &iri(ns::GEO, "hasGeometry")).clone();
        let wkt = single_object(&g, &geometry, &iri(ns::GEO, "asWKT"));
        assert_eq!(
            wkt,
            &Term::typed("POINT (120 -25)", iri(ns::GEO, "wktLiteral"))
        );
    }

    #[test]
    fn test_su_graph_bounds_in_years() {
        let g = su_graph(&unit());
        let history = single_object(&g, &subject(), &iri(ns::SU, "geologicHistory")).clone();

        let younger = single_object(&g, &history, &iri(ns::SU, "youngerBound")).clone();
        assert_eq!(
            single_object(&g, &younger, &iri(ns::QUDT, "value")),
            &Term::float(359_200_000.0)
        );
        assert_eq!(
            single_object(&g, &younger, &iri(ns::QUDT, "units")),
            &Term::iri(QUDT_UNIT_YEAR)
        );

        let older = single_object(&g, &history, &iri(ns::SU, "olderBound")).clone();
        assert_eq!(
            single_object(&g, &older, &iri(ns::QUDT, "value")),
            &Term::float(382_700_000.0)
        );
    }

    #[test]
    fn test_su_graph_properties_and_hierarchy() {
        let g = su_graph(&unit());
        assert!(g.contains(
            &subject(),
            &iri(ns::SU, "stratigraphicRank"),
            &Term::iri("http://resource.geosciml.org/classifier/cgi/stratigraphicrank/group")
        ));
        assert!(g.contains(
            &subject(),
            &iri(ns::SUH, "isPartOf"),
            &Term::iri("https://pid.geoscience.gov.au/def/stratname/ga/SU1")
        ));
        assert_eq!(g.objects(&subject(), &iri(ns::SU, "observationMethod")).count(), 0);
    }

    #[test]
    fn test_su_graph_without_unit_properties() {
        let mut entity = unit();
        entity.unit = None;
        assert_eq!(su_graph(&entity).len(), geosp_graph(&entity).len());
    }

    #[test]
    fn test_loop3d_graph() {
        let g = loop3d_graph(&unit());
        assert!(g.contains(&subject(), &rdf_type(), &Term::iri(iri(ns::GSOG, "Group"))));

        let event = single_object(&g, &subject(), &iri(ns::GSOC, "isParticipantIn")).clone();
        let process = single_object(&g, &event, &iri(ns::GSOC, "hasConstituent")).clone();
        assert!(g.contains(&process, &rdf_type(), &Term::iri(iri(ns::GSPR, "Deposition"))));

        let interval = single_object(&g, &event, &iri(ns::GSOC, "directTemporalOccupies")).clone();
        assert!(g.contains(
            &interval,
            &iri(ns::GSOC, "timeStartedBy"),
            &Term::iri(format!("{}Givetian", ns::ISC))
        ));

        let range = single_object(&g, &interval, &iri(ns::GSOC, "hasValue")).clone();
        let start = single_object(&g, &range, &iri(ns::GSOC, "hasStartValue")).clone();
        assert_eq!(
            single_object(&g, &start, &iri(ns::GSOG, "hasDataValue")),
            &Term::float(382.7)
        );
        let end = single_object(&g, &range, &iri(ns::GSOC, "hasEndValue")).clone();
        assert_eq!(
            single_object(&g, &end, &iri(ns::GSOG, "hasDataValue")),
            &Term::float(359.2)
        );
        let uom = single_object(&g, &end, &iri(ns::GSOC, "hasUOM")).clone();
        assert!(g.contains(&uom, &rdf_type(), &Term::iri(iri(ns::LUNIT, "ma"))));
    }

    #[test]
    fn test_loop3d_graph_without_history() {
        let mut entity = unit();
        entity.unit = Some(StratUnitProperties::default());
        assert_eq!(loop3d_graph(&entity).len(), 1);
    }

    #[test]
    fn test_gso_process_class() {
        assert_eq!(
            gso_process_class(&format!("{}sea_level_change", ns::EP)).as_deref(),
            Some("http://loop3d.org/GSO/ontology/2020/1/geologicprocess/Sea_Level_Fluctuation")
        );
        assert_eq!(gso_process_class(&format!("{}unmapped", ns::EP)), None);
        assert_eq!(gso_process_class("http://example.com/deposition"), None);
    }
}
