// Prints the option table of a parser with one value and one trigger option.

use optparser::*;

fn main() -> Result<()> {
    let parser = OptParser::new()
        .with_option(Opt::value("a", "long-a").help("option a"))?
        .with_option(Opt::trigger("b", "long-b").help("option b"))?;

    println!("{}", parser);

    Ok(())
}
