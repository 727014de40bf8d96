use std::env;
use std::fs;

use huffcode::Compressed;

fn main() {
    let fp = env::args().nth(1).expect("Please provide path to input file as first argument.");

    let input_bytes = fs::read(fp).expect("First argument was not a valid filepath.");

    // encode scope - save to file
    {
        let packed = huffcode::compress(&input_bytes).unwrap();
        let data = rmp_serde::to_vec(&packed).unwrap();

        fs::write("encoded.mp", data).unwrap();
    }

    // decode scope - read from file
    {
        let file_data = fs::read("encoded.mp").unwrap();

        let packed: Compressed = rmp_serde::from_slice(&file_data).unwrap();
        let decoded = packed.decompress().unwrap();

        fs::write("decoded.txt", decoded).unwrap();
    }
}
