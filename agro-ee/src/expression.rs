//! Builder for Earth Engine REST expression graphs.
//!
//! The REST API evaluates a serialized graph of value nodes. Every node here is
//! one of `constantValue`, `functionInvocationValue`, `arrayValue` or
//! `dictionaryValue`; the whole tree is inlined under a single result key.
//!
//! Only the algorithms the dashboard needs are wrapped.

use crate::dataset::{Dataset, MAX_PIXELS};
use crate::period::{AnalysisPeriod, Period, DATE_FORMAT};
use crate::region::{RegionCatalog, RegionSelection};
use chrono::{Days, NaiveDate};
use serde_json::{json, Map, Value};

/// A single value node of an expression graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node(Value);

impl Node {
    pub fn constant(value: impl Into<Value>) -> Self {
        Node(json!({ "constantValue": value.into() }))
    }

    pub fn invoke(function_name: &str, arguments: Vec<(&str, Node)>) -> Self {
        let arguments: Map<String, Value> = arguments
            .into_iter()
            .map(|(name, node)| (name.to_string(), node.0))
            .collect();
        Node(json!({
            "functionInvocationValue": {
                "functionName": function_name,
                "arguments": arguments,
            }
        }))
    }

    pub fn array(values: Vec<Node>) -> Self {
        let values: Vec<Value> = values.into_iter().map(|n| n.0).collect();
        Node(json!({ "arrayValue": { "values": values } }))
    }

    pub fn dictionary(entries: Vec<(&str, Node)>) -> Self {
        let values: Map<String, Value> = entries
            .into_iter()
            .map(|(key, node)| (key.to_string(), node.0))
            .collect();
        Node(json!({ "dictionaryValue": { "values": values } }))
    }

    /// Wrap the node as a complete `Expression` message.
    pub fn into_expression(self) -> Value {
        json!({
            "result": "0",
            "values": { "0": self.0 },
        })
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

fn date_string(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `ee.FeatureCollection(asset)`
pub fn load_table(asset: &str) -> Node {
    Node::invoke("Collection.loadTable", vec![("tableId", Node::constant(asset))])
}

/// `collection.filter(ee.Filter.eq(field, value))`
pub fn filter_equals(collection: Node, field: &str, value: &str) -> Node {
    let filter = Node::invoke(
        "Filter.equals",
        vec![
            ("leftField", Node::constant(field)),
            ("rightValue", Node::constant(value)),
        ],
    );
    Node::invoke(
        "Collection.filter",
        vec![("collection", collection), ("filter", filter)],
    )
}

/// `collection.aggregate_array(property)`
pub fn aggregate_array(collection: Node, property: &str) -> Node {
    Node::invoke(
        "AggregateFeatureCollection.array",
        vec![
            ("collection", collection),
            ("property", Node::constant(property)),
        ],
    )
}

/// `collection.geometry()`
pub fn collection_geometry(collection: Node) -> Node {
    Node::invoke("Collection.geometry", vec![("collection", collection)])
}

/// `ee.ImageCollection(id)`
pub fn load_image_collection(id: &str) -> Node {
    Node::invoke("ImageCollection.load", vec![("id", Node::constant(id))])
}

/// `collection.filterDate(start, end)` with `end` exclusive.
pub fn filter_date(collection: Node, start: NaiveDate, end_exclusive: NaiveDate) -> Node {
    let range = Node::invoke(
        "DateRange",
        vec![
            ("start", Node::constant(date_string(start))),
            ("end", Node::constant(date_string(end_exclusive))),
        ],
    );
    let filter = Node::invoke(
        "Filter.dateRangeContains",
        vec![
            ("leftValue", range),
            ("rightField", Node::constant("system:time_start")),
        ],
    );
    Node::invoke(
        "Collection.filter",
        vec![("collection", collection), ("filter", filter)],
    )
}

/// `collection.filterBounds(geometry)`
pub fn filter_bounds(collection: Node, geometry: Node) -> Node {
    let filter = Node::invoke(
        "Filter.intersects",
        vec![
            ("leftField", Node::constant(".all")),
            ("rightValue", geometry),
        ],
    );
    Node::invoke(
        "Collection.filter",
        vec![("collection", collection), ("filter", filter)],
    )
}

/// `collection.size()`
pub fn collection_size(collection: Node) -> Node {
    Node::invoke("Collection.size", vec![("collection", collection)])
}

/// `image.select([band])`
pub fn select_band(image: Node, band: &str) -> Node {
    Node::invoke(
        "Image.select",
        vec![
            ("input", image),
            ("bandSelectors", Node::array(vec![Node::constant(band)])),
        ],
    )
}

fn constant_image(value: f64) -> Node {
    Node::invoke("Image.constant", vec![("value", Node::constant(value))])
}

/// `image.multiply(factor).add(offset)`, skipping identity steps.
pub fn scale_image(image: Node, multiply: f64, add: f64) -> Node {
    let mut image = image;
    if multiply != 1.0 {
        image = Node::invoke(
            "Image.multiply",
            vec![("image1", image), ("image2", constant_image(multiply))],
        );
    }
    if add != 0.0 {
        image = Node::invoke(
            "Image.add",
            vec![("image1", image), ("image2", constant_image(add))],
        );
    }
    image
}

/// `image.clip(geometry)`
pub fn clip(image: Node, geometry: Node) -> Node {
    Node::invoke("Image.clip", vec![("input", image), ("geometry", geometry)])
}

/// `image.reduceRegion(reducer, geometry, scale, maxPixels=1e9)`
pub fn reduce_region(image: Node, reducer: &str, geometry: Node, scale: f64) -> Node {
    Node::invoke(
        "Image.reduceRegion",
        vec![
            ("image", image),
            ("reducer", Node::invoke(reducer, vec![])),
            ("geometry", geometry),
            ("scale", Node::constant(scale)),
            ("maxPixels", Node::constant(MAX_PIXELS)),
        ],
    )
}

/// `dictionary.get(key, null)`; a missing key evaluates to null instead of failing.
pub fn dictionary_get(dictionary: Node, key: &str) -> Node {
    Node::invoke(
        "Dictionary.get",
        vec![
            ("dictionary", dictionary),
            ("key", Node::constant(key)),
            ("defaultValue", Node::constant(Value::Null)),
        ],
    )
}

/// Names of every first-level region in the catalog.
pub fn state_names(catalog: &RegionCatalog) -> Node {
    aggregate_array(load_table(&catalog.states_asset), &catalog.state_name_field)
}

/// Names of the second-level regions whose parent field equals `state`.
pub fn municipality_names(catalog: &RegionCatalog, state: &str) -> Node {
    let municipalities = filter_equals(
        load_table(&catalog.municipalities_asset),
        &catalog.parent_field,
        state,
    );
    aggregate_array(municipalities, &catalog.municipality_name_field)
}

/// Geometry of the selected municipality.
pub fn region_geometry(catalog: &RegionCatalog, selection: &RegionSelection) -> Node {
    let by_state = filter_equals(
        load_table(&catalog.municipalities_asset),
        &catalog.parent_field,
        &selection.state,
    );
    let by_name = filter_equals(
        by_state,
        &catalog.municipality_name_field,
        &selection.municipality,
    );
    collection_geometry(by_name)
}

/// The dataset's images restricted to the analysis window, the region and
/// one period.
///
/// The window end is inclusive, so the exclusive filter bound is the next day.
pub fn period_collection(
    dataset: &Dataset,
    window: &AnalysisPeriod,
    period: &Period,
    geometry: Node,
) -> Node {
    let window_end = window
        .end()
        .checked_add_days(Days::new(1))
        .unwrap_or(window.end());
    let in_window = filter_date(
        load_image_collection(&dataset.collection),
        window.start(),
        window_end,
    );
    let in_region = filter_bounds(in_window, geometry);
    filter_date(in_region, period.start_date(), period.end_date_exclusive())
}

/// A single-band image named `band` whose every pixel is masked.
pub fn masked_band_image(band: &str) -> Node {
    let renamed = Node::invoke(
        "Image.rename",
        vec![
            ("input", constant_image(0.0)),
            ("names", Node::array(vec![Node::constant(band)])),
        ],
    );
    Node::invoke(
        "Image.updateMask",
        vec![("image", renamed), ("mask", constant_image(0.0))],
    )
}

/// `ee.Algorithms.If(condition, true_case, false_case)`; only the chosen
/// branch is evaluated.
pub fn if_else(condition: Node, true_case: Node, false_case: Node) -> Node {
    Node::invoke(
        "Algorithms.If",
        vec![
            ("condition", condition),
            ("trueCase", true_case),
            ("falseCase", false_case),
        ],
    )
}

/// One temporally reduced, band-selected, unit-converted image for a period.
///
/// Scaling is applied after the temporal reduction; this is exact for the
/// linear conversions used (offsets only occur with the mean reducer).
/// Reducing an empty collection yields an image without bands, so a period
/// with no images falls back to a fully masked image of the band and every
/// region statistic over it comes back null.
pub fn period_image(dataset: &Dataset, collection: Node) -> Node {
    let reduced = Node::invoke(
        dataset.temporal_reducer.function_name(),
        vec![("collection", collection.clone())],
    );
    let selected = select_band(reduced, &dataset.band);
    let scaled = scale_image(selected, dataset.scaling.multiply, dataset.scaling.add);
    if_else(
        collection_size(collection),
        scaled,
        masked_band_image(&dataset.band),
    )
}

/// `{image_count, value}` for one period: the number of source images and the
/// region mean of the aggregate (null when the region has no valid pixels).
pub fn period_sample(
    dataset: &Dataset,
    window: &AnalysisPeriod,
    period: &Period,
    geometry: Node,
) -> Node {
    let collection = period_collection(dataset, window, period, geometry.clone());
    let image = period_image(dataset, collection.clone());
    let stats = reduce_region(image, "Reducer.mean", geometry, dataset.scale);
    Node::dictionary(vec![
        ("image_count", collection_size(collection)),
        ("value", dictionary_get(stats, &dataset.band)),
    ])
}

/// Min/max of a period aggregate over the region, for map color ramps.
pub fn period_min_max(
    dataset: &Dataset,
    window: &AnalysisPeriod,
    period: &Period,
    geometry: Node,
    scale: f64,
) -> Node {
    let collection = period_collection(dataset, window, period, geometry.clone());
    let image = period_image(dataset, collection);
    reduce_region(image, "Reducer.minMax", geometry, scale)
}

/// The period aggregate clipped to the region, ready for map tiles.
pub fn period_map_image(
    dataset: &Dataset,
    window: &AnalysisPeriod,
    period: &Period,
    geometry: Node,
) -> Node {
    let collection = period_collection(dataset, window, period, geometry.clone());
    clip(period_image(dataset, collection), geometry)
}
