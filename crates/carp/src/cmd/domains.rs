use carp_domain::DomainTable;

use crate::cmd::DomainsArgs;
use crate::exit::{domain_error, CliResult, SUCCESS};
use crate::output::{print_report, DomainListing, OutputFormat};

pub fn run(args: DomainsArgs, format: OutputFormat) -> CliResult<i32> {
    let table = DomainTable::load(&args.file)
        .map_err(|err| domain_error(&format!("failed to load {}", args.file.display()), err))?;
    print_report(&DomainListing::from_table(&table, args.messages, None), format);
    Ok(SUCCESS)
}
