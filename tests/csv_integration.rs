pub mod common;

use std::{error::Error, fs, io::Cursor};

use common::{data_file, init_logger, rows};
use csv_stream::{
    core::step::{StepBuilder, StepStatus},
    item::csv::{
        csv_reader::CsvItemReaderBuilder, csv_writer::CsvItemWriterBuilder,
        document::CsvDocument, format::CsvFormat,
    },
};
use rand::distr::{Alphanumeric, SampleString};

fn load(name: &str) -> Result<Vec<Vec<String>>, Box<dyn Error>> {
    init_logger();
    let reader = CsvItemReaderBuilder::new().from_path(data_file(name))?;
    Ok(reader.read_all()?)
}

#[test]
fn empty_file_should_be_one_empty_field() -> Result<(), Box<dyn Error>> {
    assert_eq!(load("empty.csv")?, rows(&[&[""]]));
    Ok(())
}

#[test]
fn simple_file_should_have_two_records() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        load("simple.csv")?,
        rows(&[&["aaa", "bbb", "ccc"], &["xxx", "yyy", "zzz"]])
    );
    Ok(())
}

#[test]
fn three_blank_lines_should_be_three_empty_records() -> Result<(), Box<dyn Error>> {
    assert_eq!(load("three-blank-lines.csv")?, rows(&[&[""], &[""], &[""]]));
    Ok(())
}

#[test]
fn empty_fields_should_be_read_anywhere_in_a_record() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        load("empty-field.csv")?,
        rows(&[
            &["aaa", "bbb", "ccc"],
            &["", "eee", "fff"],
            &["ggg", "", "jjj"],
            &["xxx", "yyy", ""],
        ])
    );
    Ok(())
}

#[test]
fn field_names_should_be_plain_records() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        load("field-names.csv")?,
        rows(&[
            &["Title", "Forename", "Last Name", "Age"],
            &["Mr.", "John", "Smith", "21"],
            &["Mrs.", "Jane", "Doe-Jones", "42"],
        ])
    );
    Ok(())
}

#[test]
fn quoted_fields_should_hold_commas_quotes_and_tabs() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        load("quoted.csv")?,
        rows(&[
            &["2lines, 2 fields, With, commas", "With \"Quotes\""],
            &["With\tTabs", "Quotes\" and \"\t\"TABS AND,commas"],
        ])
    );
    Ok(())
}

#[test]
fn quoted_line_breaks_should_be_kept_verbatim() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        load("quoted-linebreaks.csv")?,
        rows(&[&[
            "A longer entry with some new\r\nlines\r\neven\r\n\r\na blank one.",
            "",
            "Quotes\r\n\" and \r\n\"\t\"TABS \r\nAND,commas",
        ]])
    );
    Ok(())
}

#[test]
fn spaces_should_be_preserved() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        load("spaces.csv")?,
        rows(&[&["trailing ", " leading", " both "]])
    );
    Ok(())
}

#[test]
fn jagged_records_should_keep_their_field_counts() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        load("different-number-fields.csv")?,
        rows(&[
            &["A", "B", "C"],
            &["a", "b", "c", "d"],
            &["9", "8"],
            &["1", "2", "3", "4", "5"],
        ])
    );
    Ok(())
}

#[test]
fn unix_line_ends_should_be_accepted() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        load("unix-line-ends.csv")?,
        rows(&[&["aaa", "bbb", "ccc"], &["xxx", "yyy", "zzz"]])
    );
    Ok(())
}

#[test]
fn field_record_and_all_should_interleave() -> Result<(), Box<dyn Error>> {
    let all = load("mixed.csv")?;
    assert_eq!(
        all,
        rows(&[
            &["Name", "Quote, with comma", "Multi"],
            &["Ann \"the\" Writer", "", "line one\r\nline two"],
            &["Bob", "", ""],
            &[""],
            &["last"],
        ])
    );

    let reader = CsvItemReaderBuilder::new().from_path(data_file("mixed.csv"))?;

    let first_field = reader.read_field()?;
    let rest_of_record = reader.read_record()?;
    let rest_of_file = reader.read_all()?;

    assert_eq!(first_field.as_ref(), Some(&all[0][0]));
    assert_eq!(rest_of_record.as_deref(), Some(&all[0][1..]));
    assert_eq!(rest_of_file, all[1..]);
    assert!(reader.read_all()?.is_empty());
    Ok(())
}

#[test]
fn records_should_survive_a_round_trip() -> Result<(), Box<dyn Error>> {
    let records = rows(&[
        &["plain", "with,comma", "with \"quotes\""],
        &[""],
        &["crlf\r\ninside", "lf\ninside", "cr\rinside", "\r\n"],
        &["", "", ""],
        &["\"", "\"\"", ",", " "],
        &["Océane", "Évrat", "😀"],
        &["end"],
    ]);

    let writer = CsvItemWriterBuilder::new().from_writer(vec![]);
    writer.write_all(&records)?;
    let bytes = writer.into_inner()?;

    let reader = CsvItemReaderBuilder::new().from_reader(bytes.as_slice());
    assert_eq!(reader.read_all()?, records);
    Ok(())
}

#[test]
fn trailing_empty_record_should_not_be_read_back() -> Result<(), Box<dyn Error>> {
    let writer = CsvItemWriterBuilder::new().from_writer(vec![]);
    writer.write_all(&rows(&[&["a"], &[""]]))?;
    let bytes = writer.into_inner()?;

    assert_eq!(bytes, b"a\r\n");

    let reader = CsvItemReaderBuilder::new().from_reader(bytes.as_slice());
    assert_eq!(reader.read_all()?, rows(&[&["a"]]));
    Ok(())
}

/// Turns random alphanumeric text into CSV-hostile text.
fn hostile(sample: &str) -> String {
    sample
        .chars()
        .map(|c| match c {
            'a' | 'A' => ',',
            'b' | 'B' => '"',
            'c' => '\r',
            'd' => '\n',
            'e' => ' ',
            'f' => '|',
            'g' => '*',
            other => other,
        })
        .collect()
}

fn random_records() -> Vec<Vec<String>> {
    let mut rng = rand::rng();
    let mut records = Vec::new();

    for _ in 0..64 {
        let shape = Alphanumeric.sample_string(&mut rng, 1).as_bytes()[0];
        let field_count = usize::from(shape % 5) + 1;

        let record = (0..field_count)
            .map(|_| {
                let length = usize::from(Alphanumeric.sample_string(&mut rng, 1).as_bytes()[0] % 12);
                hostile(&Alphanumeric.sample_string(&mut rng, length))
            })
            .collect();
        records.push(record);
    }

    // A lone empty field on the last line would write nothing after the
    // final terminator.
    records.push(vec!["last".to_string()]);
    records
}

#[test]
fn random_records_should_survive_a_round_trip() -> Result<(), Box<dyn Error>> {
    for format in [
        CsvFormat::default(),
        CsvFormat {
            quote_limit: 0,
            ..CsvFormat::default()
        },
        CsvFormat {
            separator: b'|',
            quote: b'*',
            quote_limit: 4,
        },
    ] {
        let records = random_records();

        let writer = CsvItemWriterBuilder::new()
            .format(&format)
            .from_writer(vec![]);
        writer.write_all(&records)?;
        let bytes = writer.into_inner()?;

        let reader = CsvItemReaderBuilder::new()
            .format(&format)
            .capacity(7)
            .from_reader(Cursor::new(bytes));
        assert_eq!(reader.read_all()?, records, "with {format:?}");
    }
    Ok(())
}

#[test]
fn alternate_delimiters_should_not_quote_commas_or_quotes() -> Result<(), Box<dyn Error>> {
    let records = rows(&[
        &["AA,AA original separator", "BB|BB new separator", "CCCC"],
        &["\"quoted\"", "star*", "x"],
    ]);

    let writer = CsvItemWriterBuilder::new()
        .separator(b'|')
        .quote(b'*')
        .from_writer(vec![]);
    writer.write_all(&records)?;
    let bytes = writer.into_inner()?;

    assert_eq!(
        String::from_utf8(bytes.clone())?,
        "AA,AA original separator|*BB|BB new separator*|CCCC\r\n\"quoted\"|*star***|x"
    );

    let reader = CsvItemReaderBuilder::new()
        .separator(b'|')
        .quote(b'*')
        .from_reader(bytes.as_slice());
    assert_eq!(reader.read_all()?, records);
    Ok(())
}

#[test]
fn written_output_should_be_standard_csv() -> Result<(), Box<dyn Error>> {
    let records = rows(&[
        &["a,b", "c\"d", "line\r\nbreak"],
        &["x", "", "z"],
        &["jagged"],
    ]);

    let writer = CsvItemWriterBuilder::new().from_writer(vec![]);
    writer.write_all(&records)?;
    let bytes = writer.into_inner()?;

    let mut oracle = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes.as_slice());
    let parsed = oracle
        .records()
        .map(|record| record.map(|r| r.iter().map(String::from).collect::<Vec<_>>()))
        .collect::<Result<Vec<_>, csv::Error>>()?;

    assert_eq!(parsed, records);
    Ok(())
}

#[test]
fn standard_csv_should_be_read() -> Result<(), Box<dyn Error>> {
    let records = rows(&[
        &["city", "country", "pop"],
        &["Boston", "United States", "4628910"],
        &["Concord, NH", "United \"States\"", "42695"],
        &["multi\nline", "", "1"],
    ]);

    let mut oracle = csv::WriterBuilder::new().from_writer(vec![]);
    for record in &records {
        oracle.write_record(record)?;
    }
    let bytes = oracle.into_inner().map_err(|e| e.into_error())?;

    let reader = CsvItemReaderBuilder::new().from_reader(bytes.as_slice());
    assert_eq!(reader.read_all()?, records);
    Ok(())
}

#[test]
fn document_should_survive_save_and_load() -> Result<(), Box<dyn Error>> {
    init_logger();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("document.csv");

    let mut document = CsvDocument::from_rows(load("quoted-linebreaks.csv")?);
    document.save(&path, &CsvFormat::default())?;

    let loaded = CsvDocument::load(&path, &CsvFormat::default())?;
    assert_eq!(loaded.rows(), document.rows());
    assert_eq!(loaded.path(), Some(path.as_path()));
    Ok(())
}

#[test]
fn step_should_convert_a_file() -> Result<(), Box<dyn Error>> {
    init_logger();
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("pipes.csv");

    let reader = CsvItemReaderBuilder::new().from_path(data_file("field-names.csv"))?;
    let writer = CsvItemWriterBuilder::new()
        .separator(b'\t')
        .from_path(&output)?;

    let step = StepBuilder::new()
        .name("to-tabs")
        .reader(&reader)
        .writer(&writer)
        .chunk(2)
        .build();
    let execution = step.execute()?;
    drop(writer);

    assert_eq!(execution.status, StepStatus::Success);
    assert_eq!(execution.read_count, 3);
    assert_eq!(execution.write_count, 3);
    assert_eq!(
        fs::read_to_string(&output)?,
        "Title\tForename\tLast Name\tAge\r\nMr.\tJohn\tSmith\t21\r\nMrs.\tJane\tDoe-Jones\t42"
    );
    Ok(())
}
