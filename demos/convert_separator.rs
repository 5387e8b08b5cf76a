use csv_stream::{
    core::step::StepBuilder,
    error::CsvError,
    item::csv::{
        csv_reader::CsvItemReaderBuilder, csv_writer::CsvItemWriterBuilder, format::CsvFormat,
    },
};

/// Re-encodes comma separated data with pipes and stars, the way a format
/// description loaded from JSON asks for it.
fn main() -> Result<(), CsvError> {
    env_logger::init();

    let csv = "year,make,model,description\r\n\
               1948,Porsche,356,\"Luxury sports car, \"\"the\"\" first\"\r\n\
               1967,Ford,Mustang fastback 1967,American car|muscle";

    let target = CsvFormat::from_json(r#"{ "separator": "|", "quote": "*" }"#)?;

    let reader = CsvItemReaderBuilder::new().from_reader(csv.as_bytes());
    let writer = CsvItemWriterBuilder::new()
        .format(&target)
        .from_writer(vec![]);

    let execution = StepBuilder::new()
        .name("comma-to-pipe")
        .reader(&reader)
        .writer(&writer)
        .chunk(2)
        .build()
        .execute()?;

    println!(
        "{} records converted in {:?} using {}",
        execution.write_count,
        execution.duration,
        target.to_json()?
    );
    println!("{}", String::from_utf8_lossy(&writer.into_inner()?));

    Ok(())
}
