use chrono::{TimeZone, Utc};
use horizons_client::{Client, EphemerisQuery};

fn main() {
    let mut client = Client::new(horizons_client::DEFAULT_URL).unwrap();

    // Jupiter as seen from Maunakea
    let query = EphemerisQuery::new("599")
        .center("568")
        .start(Utc.with_ymd_and_hms(2023, 3, 1, 21, 55, 0).unwrap())
        .stop(Utc.with_ymd_and_hms(2023, 3, 2, 4, 25, 0).unwrap())
        .step(10);
    let eph = client.ephemerides(&query).unwrap();

    println!("Got {} records", eph.len());
    for record in eph.iter() {
        match record.airmass {
            Some(airmass) => println!("{}  {:.3}", record.datetime_str, airmass),
            None => println!("{}  below horizon", record.datetime_str),
        }
    }
}
