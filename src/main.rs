use aaiclock::{angle, datetime, location, timezone, version, DateTimeTriple, FormatConfig, Position};
use std::{env, error::Error};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Commands:
  dms <degrees>                          decimal degrees to D:MM:SS.s
  dec <D[:M[:S]]>                        D:M:S to decimal degrees
  tz-from-lon <longitude>                whole-hour timezone for a longitude
  tz <timezone>                          normalize a timezone string
  shift <date> <time> <timezone> <secs>  shift a local reading by seconds
  dst2st <date> <time> <timezone>        daylight saving time to standard time
  st2dst <date> <time> <timezone>        standard time to daylight saving time
  std <date> <time> <timezone> <is_dst>  reading in standard time
  jd <date> <time> <timezone>            Julian date of a local reading
  from-jd <julian_date> [timezone]       reading of a Julian date (UTC by default)
  locate <latitude> <longitude>          location form values for a position

Set AAICLOCK_DMS_PRECISION to change the decimals of DMS seconds, RUST_LOG for logging.";

fn usage() -> String {
    format!("Usage: ./{} <command> [args...]\n\n{}", version::name(), USAGE)
}

/// Fetch the positional argument at `index`, or fail with the usage text.
fn arg<'a>(args: &'a [String], index: usize) -> Result<&'a str, Box<dyn Error>> {
    args.get(index).map(String::as_str).ok_or_else(|| usage().into())
}

fn print_triple(triple: &DateTimeTriple) {
    println!("date:     {}", triple.date);
    println!("time:     {}", triple.time);
    println!("timezone: {}", triple.timezone);
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = FormatConfig::from_env()?;

    match arg(&args, 0)? {
        "dms" => {
            let degrees: f64 = arg(&args, 1)?.parse()?;
            println!("{}", angle::degrees_to_dms(degrees, config.dms_precision)?);
        }
        "dec" => {
            println!("{}", angle::dms_to_degrees(arg(&args, 1)?)?);
        }
        "tz-from-lon" => {
            let longitude: f64 = arg(&args, 1)?.parse()?;
            println!("{}", timezone::derive_timezone_offset(longitude)?);
        }
        "tz" => {
            let tz = timezone::normalize_timezone(arg(&args, 1)?)?;
            println!("{:30} {}", "Offset (hours)", tz.offset_hours);
            println!("{:30} {}", "Offset", tz.offset_string);
        }
        "shift" => {
            let delta_seconds: f64 = arg(&args, 4)?.parse()?;
            let triple = datetime::shift_date_time(arg(&args, 1)?, arg(&args, 2)?, arg(&args, 3)?, delta_seconds)?;
            print_triple(&triple);
        }
        "dst2st" => {
            print_triple(&datetime::daylight_to_standard(arg(&args, 1)?, arg(&args, 2)?, arg(&args, 3)?)?);
        }
        "st2dst" => {
            print_triple(&datetime::standard_to_daylight(arg(&args, 1)?, arg(&args, 2)?, arg(&args, 3)?)?);
        }
        "std" => {
            let is_dst: bool = arg(&args, 4)?.parse()?;
            print_triple(&datetime::standard_time(arg(&args, 1)?, arg(&args, 2)?, arg(&args, 3)?, is_dst)?);
        }
        "jd" => {
            println!("{}", datetime::datetime_to_julian_date(arg(&args, 1)?, arg(&args, 2)?, arg(&args, 3)?)?);
        }
        "from-jd" => {
            let julian_date: f64 = arg(&args, 1)?.parse()?;
            let timezone = args.get(2).map(String::as_str).unwrap_or("+00:00");
            print_triple(&datetime::julian_date_to_datetime(julian_date, timezone)?);
        }
        "locate" => {
            let position = Position {
                latitude: arg(&args, 1)?.parse()?,
                longitude: arg(&args, 2)?.parse()?,
            };
            let observer = location::locate(Some(&position), &config)?;
            for (field, value) in observer.fields().iter() {
                println!("{:30} {}", field.id(), value);
            }
        }
        "--version" | "-V" => println!("{}", version::banner()),
        "--help" | "-h" | "help" => println!("{}", usage()),
        other => return Err(format!("Unknown command {:?}\n\n{}", other, usage()).into()),
    }

    Ok(())
}
