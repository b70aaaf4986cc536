use carp_domain::{CatalogConfig, DomainTable};

use crate::cmd::MergeArgs;
use crate::exit::{domain_error, CliResult, SUCCESS};
use crate::output::{print_report, DomainListing, OutputFormat};

pub fn run(args: MergeArgs, format: OutputFormat) -> CliResult<i32> {
    let mut config = CatalogConfig {
        fail_on_duplicate_domain: !args.allow_duplicates,
        ..CatalogConfig::default()
    };
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }

    let context = format!("failed to merge {}", args.dir.display());
    let table = DomainTable::from_directory_with_config(&args.dir, config)
        .map_err(|err| domain_error(&context, err))?;
    table
        .save(&args.out)
        .map_err(|err| domain_error(&format!("failed to write {}", args.out.display()), err))?;

    tracing::info!(
        domains = table.len(),
        out = %args.out.display(),
        "domain table written"
    );

    let listing = DomainListing::from_table(&table, false, Some(args.out.display().to_string()));
    print_report(&listing, format);
    Ok(SUCCESS)
}
