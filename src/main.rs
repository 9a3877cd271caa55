use clap::Parser;
use miette::Result;
use bomq::cli::{commands, Cli, Commands};
use bomq::core::logging;

fn main() -> Result<()> {
    // Piping into `head` closes stdout early; exit quietly instead of panicking.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    logging::init(global.verbose, global.quiet);

    match cli.command {
        Commands::Init(args) => commands::init::run(args, &global),
        Commands::Reset(args) => commands::reset::run(args, &global),
        Commands::Cmp(cmd) => commands::cmp::run(cmd, &global),
        Commands::Asm(cmd) => commands::asm::run(cmd, &global),
        Commands::Quote(cmd) => commands::quote::run(cmd, &global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
