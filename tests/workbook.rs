use std::path::Path;

use roster_tools::actions;
use roster_tools::io::{TableStore, WorkbookStore};
use roster_tools::model::{Cell, Season};
use roster_tools::{Config, ToolError};
use calamine::{DataType, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::{Format, Workbook};
use tempfile::tempdir;

/// Source row fields at their default offsets: category, subject, identifier,
/// last name, first name, grade, score.
type SourceFields<'a> = (&'a str, &'a str, Cell, &'a str, &'a str, f64, Option<f64>);

fn write_source_workbook(path: &Path, seasons: &[(&str, Vec<SourceFields<'_>>)]) {
    let mut workbook = Workbook::new();

    let notes = workbook.add_worksheet();
    notes.set_name("Notes").expect("sheet named");
    notes.write_string(0, 0, "Exported from the district portal").expect("note written");

    for (sheet_name, rows) in seasons {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*sheet_name).expect("sheet named");
        for col in 0..19u16 {
            worksheet
                .write_string(0, col, format!("Column {col}"))
                .expect("header written");
        }
        for (index, (category, subject, id, last, first, grade, score)) in rows.iter().enumerate() {
            let row = index as u32 + 1;
            worksheet.write_string(row, 0, *category).expect("category");
            worksheet.write_string(row, 1, *subject).expect("subject");
            worksheet.write_string(row, 5, "Room 12").expect("filler");
            match id {
                Cell::Number(value) => worksheet.write_number(row, 10, *value).expect("id"),
                other => worksheet.write_string(row, 10, other.to_text()).expect("id"),
            };
            worksheet.write_string(row, 11, *last).expect("last name");
            worksheet.write_string(row, 12, *first).expect("first name");
            worksheet.write_number(row, 14, *grade).expect("grade");
            if let Some(score) = score {
                worksheet.write_number(row, 18, *score).expect("score");
            }
        }
    }

    workbook.save(path).expect("source workbook saved");
}

fn table(store: &WorkbookStore, name: &str) -> Vec<Vec<Cell>> {
    store
        .read_table(name)
        .expect("table read")
        .unwrap_or_else(|| panic!("sheet '{name}' present"))
}

#[test]
fn seasons_and_combined_sheet_are_built_from_workbook() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("roster.xlsx");
    let output = temp_dir.path().join("roster-out.xlsx");
    write_source_workbook(
        &input,
        &[
            (
                "Fall Data",
                vec![
                    ("MATH-5", "Mathematics", "S100".into(), "Lee", "Ana", 5.0, Some(80.0)),
                    ("MATH-5", "Mathematics", "S100".into(), "Lee", "Ana", 5.0, Some(91.0)),
                    ("ELA-5", "Reading", "S100".into(), "Lee", "Ana", 5.0, Some(60.0)),
                    ("math 6", "Mathematics", Cell::Number(1001.0), "adams", "Zoe", 6.0, Some(70.0)),
                ],
            ),
            (
                "Winter Data",
                vec![("MATH-5", "Mathematics", "S100".into(), "Lee", "Ana", 5.0, Some(85.0))],
            ),
            ("Spring Data", Vec::new()),
        ],
    );
    let config = Config::default();

    let outcomes = actions::refresh_all_seasons(&input, &output, &config).expect("seasons refreshed");
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].result.as_ref().expect("fall").rows_written, 2);
    assert_eq!(outcomes[0].result.as_ref().expect("fall").duplicates_dropped(), 1);
    assert_eq!(outcomes[1].result.as_ref().expect("winter").rows_written, 1);
    assert!(matches!(
        outcomes[2].result,
        Err(ToolError::EmptySource { season: Season::Spring, .. })
    ));

    let report = actions::rebuild_combined(&output, &output, &config).expect("combined rebuilt");
    assert_eq!(report.rows_written, 2);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("Spring Math"));

    let store = WorkbookStore::open(&output).expect("output workbook opened");
    assert_eq!(
        store.sheets().sheet_names(),
        vec![
            "Notes",
            "Fall Data",
            "Winter Data",
            "Spring Data",
            "Fall Math",
            "Winter Math",
            "Combined Math"
        ]
    );
    assert_eq!(
        table(&store, "Notes"),
        vec![vec![Cell::from("Exported from the district portal")]]
    );

    let fall = table(&store, "Fall Math");
    assert_eq!(fall[0].last(), Some(&Cell::from("Fall Percentile")));
    assert_eq!(
        fall[1..],
        [
            vec![
                Cell::Number(1001.0),
                Cell::from("adams"),
                Cell::from("Zoe"),
                Cell::from("Mathematics"),
                Cell::Number(6.0),
                Cell::Number(70.0),
            ],
            vec![
                Cell::from("S100"),
                Cell::from("Lee"),
                Cell::from("Ana"),
                Cell::from("Mathematics"),
                Cell::Number(5.0),
                Cell::Number(80.0),
            ],
        ]
    );

    let combined = table(&store, "Combined Math");
    assert_eq!(combined[0].len(), 8);
    assert_eq!(
        combined[1..],
        [
            vec![
                Cell::from("Zoe"),
                Cell::from("adams"),
                Cell::Number(1001.0),
                Cell::from("Mathematics"),
                Cell::Number(6.0),
                Cell::Number(70.0),
                Cell::Blank,
                Cell::Blank,
            ],
            vec![
                Cell::from("Ana"),
                Cell::from("Lee"),
                Cell::from("S100"),
                Cell::from("Mathematics"),
                Cell::Number(5.0),
                Cell::Number(80.0),
                Cell::Number(85.0),
                Cell::Blank,
            ],
        ]
    );
}

#[test]
fn missing_source_leaves_workbook_untouched() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("roster.xlsx");
    let output = temp_dir.path().join("roster-out.xlsx");
    write_source_workbook(&input, &[]);

    let error = actions::refresh_season(&input, &output, &Config::default(), Season::Winter)
        .expect_err("winter source is missing");

    assert!(matches!(error, ToolError::MissingSource { season: Season::Winter, .. }));
    assert!(!output.exists());
}

#[test]
fn missing_workbook_is_reported() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("absent.xlsx");

    let error = actions::rebuild_combined(&input, &input, &Config::default())
        .expect_err("workbook is missing");
    assert!(matches!(error, ToolError::MissingInput(path) if path == input));
}

#[test]
fn refreshing_in_place_twice_yields_identical_sheets() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("roster.xlsx");
    write_source_workbook(
        &path,
        &[(
            "Fall Data",
            vec![
                ("MATH", "Math", "S2", "Kim", "Bo", 4.0, None),
                ("MATH", "Math", "S1", "kim", "al", 4.0, Some(12.5)),
            ]
            .into_iter()
            .map(|(category, subject, id, last, first, grade, score)| {
                (category, subject, Cell::from(id), last, first, grade, score)
            })
            .collect(),
        )],
    );
    let config = Config::default();

    actions::refresh_season(&path, &path, &config, Season::Fall).expect("first refresh");
    let first = WorkbookStore::open(&path).expect("workbook opened").sheets().clone();
    actions::refresh_season(&path, &path, &config, Season::Fall).expect("second refresh");
    let second = WorkbookStore::open(&path).expect("workbook opened").sheets().clone();

    assert_eq!(first, second);
    let fall = first.sheet("Fall Math").expect("destination written");
    assert_eq!(fall[1][0], Cell::from("S1"));
    assert_eq!(fall[2][5], Cell::Blank);
}

#[test]
fn config_file_redirects_sheets_and_filter() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("roster.xlsx");
    let config_path = temp_dir.path().join("config.json");
    write_source_workbook(
        &path,
        &[(
            "Fall Data",
            vec![
                ("MATH", "Math", "S1".into(), "Lee", "Ana", 5.0, Some(1.0)),
                ("ELA", "Reading", "S1".into(), "Lee", "Ana", 5.0, Some(2.0)),
            ],
        )],
    );
    std::fs::write(
        &config_path,
        r#"{
            "filter": "ela",
            "fall": {
                "source": "Fall Data",
                "destination": "Fall ELA",
                "score_header": "Fall Lexile"
            }
        }"#,
    )
    .expect("config written");

    let config = Config::load(&config_path).expect("config loaded");
    let report = actions::refresh_season(&path, &path, &config, Season::Fall).expect("refresh");
    assert_eq!(report.destination, "Fall ELA");

    let store = WorkbookStore::open(&path).expect("workbook opened");
    let rows = table(&store, "Fall ELA");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][5], Cell::from("Fall Lexile"));
    assert_eq!(rows[1][3], Cell::from("Reading"));
    assert!(store.read_table("Fall Math").expect("read").is_none());
}

#[test]
fn dates_in_source_sheets_survive_a_refresh() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("roster.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Fall Data").expect("sheet named");
    for col in 0..19u16 {
        worksheet
            .write_string(0, col, format!("Column {col}"))
            .expect("header written");
    }
    let date = Format::new().set_num_format("yyyy-mm-dd");
    let date_time = Format::new().set_num_format("yyyy-mm-dd hh:mm");
    worksheet.write_string(1, 0, "MATH-5").expect("category");
    worksheet.write_string(1, 1, "Mathematics").expect("subject");
    worksheet
        .write_number_with_format(1, 5, 45550.0, &date)
        .expect("test date");
    worksheet
        .write_number_with_format(1, 6, 45550.5, &date_time)
        .expect("test time");
    worksheet.write_string(1, 10, "S100").expect("id");
    worksheet.write_string(1, 11, "Lee").expect("last name");
    worksheet.write_string(1, 12, "Ana").expect("first name");
    worksheet.write_number(1, 18, 88.0).expect("score");
    workbook.save(&path).expect("source workbook saved");

    actions::refresh_season(&path, &path, &Config::default(), Season::Fall)
        .expect("fall refreshed");

    let mut reread: Xlsx<_> = open_workbook(&path).expect("workbook reopened");
    let range = reread
        .worksheet_range("Fall Data")
        .expect("source sheet kept")
        .expect("source sheet read");
    assert_eq!(range.get_value((1, 5)), Some(&DataType::DateTime(45550.0)));
    assert_eq!(range.get_value((1, 6)), Some(&DataType::DateTime(45550.5)));

    let store = WorkbookStore::open(&path).expect("workbook opened");
    let source = table(&store, "Fall Data");
    assert_eq!(source[1][5], Cell::DateTime(45550.0));
    assert_eq!(table(&store, "Fall Math")[1][5], Cell::Number(88.0));
}
