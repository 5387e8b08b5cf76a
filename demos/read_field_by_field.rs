use csv_stream::{error::CsvError, item::csv::csv_reader::CsvItemReaderBuilder};

/// Walks a file one field at a time, then switches to whole records.
fn main() -> Result<(), CsvError> {
    env_logger::init();

    let csv = "Title,Forename,Last Name,Age\r\n\
               Mr.,John,Smith,21\r\n\
               Mrs.,Jane,\"Doe-Jones\r\n(née Doe)\",42\r\n\
               \r\n\
               Dr.,Who,,";

    let reader = CsvItemReaderBuilder::new().from_reader(csv.as_bytes());

    let mut header = Vec::new();
    while let Some(name) = reader.read_field()? {
        header.push(name);
    }
    println!("columns: {header:?}");

    if let Some(first) = reader.read_field()? {
        println!("first value of the second record: {first:?}");
        println!("rest of that record: {:?}", reader.read_record()?);
    }

    for (line, record) in reader.read_all()?.iter().enumerate() {
        println!("{line}: {} fields {record:?}", record.len());
    }

    println!("{} bytes read", reader.position());
    Ok(())
}
