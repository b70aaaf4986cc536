use carp_domain::Domain;

use crate::cmd::InternArgs;
use crate::exit::{domain_error, CliResult, SUCCESS};
use crate::output::{print_report, InternReport, OutputFormat};

pub fn run(args: InternArgs, format: OutputFormat) -> CliResult<i32> {
    let created = args.create && !args.file.exists();
    let mut domain = if created {
        tracing::info!(file = %args.file.display(), domain = args.domain, "creating domain file");
        Domain::new(args.domain, args.name.clone())
    } else {
        Domain::load(&args.file)
            .map_err(|err| domain_error(&format!("failed to load {}", args.file.display()), err))?
    };

    let context = format!("failed to update {}", args.file.display());
    let message_id = domain
        .intern(&args.format_string)
        .map_err(|err| domain_error(&context, err))?;
    domain
        .save(&args.file)
        .map_err(|err| domain_error(&context, err))?;

    let report = InternReport {
        file: args.file.display().to_string(),
        domain: domain.domain,
        message_id,
        format: args.format_string,
        created,
    };
    print_report(&report, format);
    Ok(SUCCESS)
}
