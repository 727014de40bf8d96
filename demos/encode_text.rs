use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

fn main() -> Result<(), huffcode::Error> {
    TermLogger::init(
        LevelFilter::Debug,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .unwrap();

    let s = String::from(
        "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor \
         incididunt ut labore et dolore magna aliqua.",
    );

    let tree = huffcode::build_tree(s.as_bytes())?;
    println!("{}", tree);

    let freqs = huffcode::frequencies(&tree).unwrap_or_default();
    for (sym, code) in huffcode::codes(&tree) {
        println!("{:?} x{}: {}", sym as char, freqs[&sym], code);
    }
    println!("height: {}", huffcode::height(&tree));

    let packed = huffcode::compress(s.as_bytes())?;
    let dec = huffcode::decompress(&packed.data, packed.bit_length, &packed.alphabet)?;

    println!("{:?}", String::from_utf8(dec));
    println!("compression (raw):           x{:.2}", packed.ratio());
    println!("compression (with alphabet): x{:.2}", packed.ratio_with_alphabet());
    println!("alphabet size:               {}", packed.alphabet[0]);
    println!("max bytes for code:          {}", packed.alphabet[1]);

    Ok(())
}
