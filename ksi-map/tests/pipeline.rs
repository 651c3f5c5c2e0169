use approx::assert_abs_diff_eq;
use assert_matches::assert_matches;
use ksi_map::ksi_geo::Crs;
use ksi_map::loader::SkipReason;
use ksi_map::{
    Color, FilterConfig, KsiMapError, Pipeline, PipelineOptions, Region, Selection,
    SeverityBucket, UserMessage,
};

const MIXED_ROWS: &str = "\
geometry,Road Number,speed_limit,KSI Count
\"LINESTRING (0.40 51.70, 0.42 51.72, 0.45 51.73, 0.47 51.75, 0.50 51.755)\",A12,30,3
\"LINESTRING (0.40 51.70, 0.41 51.71)\",A12,30,0
\"POINT (0.45 51.73)\",B1,40,10
";

const ESSEX_ROADS: &str = "\
geometry,Road Number,speed_limit,KSI Count
\"LINESTRING (0.40 51.70, 0.42 51.72, 0.45 51.73, 0.47 51.75)\",A12,70,3
\"LINESTRING (0.60 51.55, 0.65 51.56)\",A127,50,6
\"LINESTRING (0.90 51.88, 0.92 51.89, 0.95 51.90)\", B1027 ,30,9
\"LINESTRING (-1.50 52.90, -1.45 52.95, -1.40 53.00)\",M1,70,12
\"LINESTRING (0.70 51.60, 0.71 51.61)\",,,
";

fn pipeline() -> Pipeline {
    Pipeline::new(PipelineOptions::default()).expect("default options are valid")
}

#[test]
fn only_valid_severe_lines_survive() {
    let output = pipeline()
        .run(MIXED_ROWS.as_bytes(), &FilterConfig::default())
        .expect("run succeeds");

    assert_eq!(output.map.segments.len(), 1);
    let segment = &output.map.segments[0];
    assert_eq!(segment.road_number, "A12");
    assert_eq!(segment.speed_limit, 30);
    assert_eq!(segment.ksi_count, 3);
    assert_eq!(segment.color, Color::YELLOW);
    assert_eq!(segment.geometry.0.len(), 500);

    assert_eq!(output.load_report.rows, 3);
    assert_matches!(
        output.load_report.skipped.as_slice(),
        [(2, SkipReason::NotLineString("Point"))]
    );
    assert!(!output.crs.reprojected);
}

#[test]
fn missing_geometry_column_shows_schema_error() {
    let csv = "wkt,Road Number,speed_limit,KSI Count\n\"LINESTRING (0 0, 1 1)\",A12,30,3\n";
    let pipeline = pipeline();

    assert_matches!(
        pipeline.run(csv.as_bytes(), &FilterConfig::default()),
        Err(KsiMapError::MissingColumn("geometry"))
    );

    let display = pipeline.run_for_display(csv.as_bytes(), &FilterConfig::default());
    assert!(display.map.is_none());
    assert_eq!(display.message, Some(UserMessage::MissingGeometryColumn));
    assert!(display.choices.road_numbers.is_empty());
}

#[test]
fn file_without_lines_shows_empty_dataset_error() {
    let csv = "geometry,KSI Count\n\"POINT (0.4 51.7)\",3\n\"POLYGON ((0 0, 1 0, 1 1, 0 0))\",4\n";
    let display = pipeline().run_for_display(csv.as_bytes(), &FilterConfig::default());

    assert!(display.map.is_none());
    assert_eq!(display.message, Some(UserMessage::NoValidGeometries));
    assert_eq!(
        display.message.map(|m| m.to_string()).as_deref(),
        Some("No valid LineString geometries found in the dataset.")
    );
}

#[test]
fn filters_are_applied_to_prepared_data() {
    let pipeline = pipeline();
    let data = pipeline.prepare(ESSEX_ROADS.as_bytes()).expect("loads");

    assert_eq!(data.records.len(), 3);
    assert_eq!(data.choices.road_numbers, ["A12", "A127", "B1027"]);
    assert_eq!(data.choices.speed_limits, [30, 50, 70]);

    let all = pipeline.render(&data, &FilterConfig::default());
    let colors: Vec<_> = all.segments.iter().map(|s| s.color).collect();
    assert_eq!(colors, [Color::YELLOW, Color::ORANGE, Color::RED]);

    let by_road = FilterConfig::default().with_roads(Selection::only(["B1027".to_string()]));
    let map = pipeline.render(&data, &by_road);
    assert_eq!(map.segments.len(), 1);
    assert_eq!(map.segments[0].geometry.0.len(), 500);

    let by_speed = FilterConfig::default().with_speeds(Selection::only([50, 70]));
    let roads: Vec<_> = pipeline
        .render(&data, &by_speed)
        .segments
        .into_iter()
        .map(|s| s.road_number)
        .collect();
    assert_eq!(roads, ["A12", "A127"]);

    let severe = FilterConfig::default().with_buckets([SeverityBucket::High]);
    let map = pipeline.render(&data, &severe);
    assert_eq!(map.segments.len(), 1);
    assert_eq!(map.segments[0].ksi_count, 9);

    let two_point_line = FilterConfig::default().with_roads(Selection::only(["A127".to_string()]));
    let map = pipeline.render(&data, &two_point_line);
    assert_eq!(map.segments[0].geometry.0.len(), 2);
}

#[test]
fn nothing_selected_shows_warning() {
    let filter = FilterConfig::default().with_buckets(Vec::new());
    let display = pipeline().run_for_display(ESSEX_ROADS.as_bytes(), &filter);

    assert!(display.map.is_none());
    assert_eq!(display.message, Some(UserMessage::NoMatches));
    assert_eq!(display.choices.road_numbers.len(), 3);
}

#[test]
fn projected_input_is_reprojected_into_region() {
    let projection = Crs::EPSG32631
        .get_projection()
        .expect("valid CRS")
        .expect("projected CRS");
    let vertices = [(0.40, 51.70), (0.42, 51.72), (0.45, 51.73), (0.47, 51.75)];
    let wkt: Vec<String> = vertices
        .iter()
        .map(|&(x, y)| {
            let p = projection
                .project(geo_types::coord! { x: x, y: y })
                .expect("projectable");
            format!("{} {}", p.x, p.y)
        })
        .collect();
    let csv = format!(
        "geometry,Road Number,speed_limit,KSI Count\n\"LINESTRING ({})\",A12,30,5\n",
        wkt.join(", ")
    );

    let output = pipeline()
        .run(csv.as_bytes(), &FilterConfig::default())
        .expect("run succeeds");

    assert!(output.crs.reprojected);
    assert_eq!(output.crs.detected, Crs::EPSG32631);
    assert_eq!(output.map.segments.len(), 1);

    let line = &output.map.segments[0].geometry.0;
    assert_eq!(line.len(), 500);
    assert_abs_diff_eq!(line[0].x, 0.40, epsilon = 1e-6);
    assert_abs_diff_eq!(line[0].y, 51.70, epsilon = 1e-6);
    assert_abs_diff_eq!(line[499].x, 0.47, epsilon = 1e-6);
    assert_abs_diff_eq!(line[499].y, 51.75, epsilon = 1e-6);
    assert_eq!(output.map.segments[0].color, Color::ORANGE);
}

#[test]
fn custom_region_and_smoothing() {
    let options = PipelineOptions::default()
        .with_region(Region {
            south: 52.8,
            north: 53.1,
            west: -1.6,
            east: -1.3,
        })
        .with_smoothing(ksi_map::SmoothingOptions {
            num_points: 50,
            ..Default::default()
        });
    let pipeline = Pipeline::new(options).expect("valid options");

    let output = pipeline
        .run(ESSEX_ROADS.as_bytes(), &FilterConfig::default())
        .expect("run succeeds");

    assert_eq!(output.map.segments.len(), 1);
    assert_eq!(output.map.segments[0].road_number, "M1");
    assert_eq!(output.map.segments[0].geometry.0.len(), 50);
    assert_abs_diff_eq!(output.map.center.x, -1.45, epsilon = 1e-12);
}

#[test]
fn geojson_output() {
    let output = pipeline()
        .run(ESSEX_ROADS.as_bytes(), &FilterConfig::default())
        .expect("run succeeds");
    let json = output.map.to_geojson_string().expect("serializable");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");

    assert_eq!(value["type"], "FeatureCollection");
    let features = value["features"].as_array().expect("features");
    assert_eq!(features.len(), 3);
    assert_eq!(features[2]["properties"]["Road Number"], "B1027");
    assert_eq!(features[2]["properties"]["stroke"], "#FF0000");
    assert_eq!(features[2]["geometry"]["type"], "LineString");
}
