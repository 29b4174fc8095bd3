use hashlife_core::BigInt;
use num_format::{CustomFormat, Grouping, ToFormattedString};

pub(super) fn format_number(value: &BigInt) -> String {
    let fmt = CustomFormat::builder()
        .grouping(Grouping::Standard)
        .separator("_")
        .build();
    match fmt {
        Ok(fmt) => value.to_formatted_string(&fmt),
        Err(_) => value.to_string(),
    }
}

pub(super) fn print_population(population: &BigInt) {
    println!("Population: {}", format_number(population));
}
