use clap::Parser;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use unihash_tables::ChainedTable;
use unihash_tables::ProbingTable;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'e', long = "exponent", default_value_t = 10)]
    exponent: u32,

    /// Number of distinct keys to insert.
    #[arg(short = 'n', long = "keys", default_value_t = 5000)]
    keys: usize,

    /// Fraction of the inserted keys to erase afterwards.
    #[arg(short = 'r', long = "erase_ratio", default_value_t = 0.25)]
    erase_ratio: f64,

    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,
}

fn main() {
    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };

    let mut chained: ChainedTable<u32> = ChainedTable::with_entropy(args.exponent, &mut rng);
    let mut probing: ProbingTable<u32> = ProbingTable::with_entropy(args.exponent, &mut rng);

    println!(
        "Initial capacity: 2^{} = {} (multipliers {:#010x} / {:#010x})",
        args.exponent,
        chained.capacity(),
        chained.multiplier(),
        probing.multiplier()
    );

    let mut keys = Vec::with_capacity(args.keys);
    while keys.len() < args.keys {
        let key: u32 = rng.random();
        let (_, inserted) = chained.insert(key, key);
        if inserted {
            probing.insert(key, key);
            keys.push(key);
        }
    }

    let to_erase = (keys.len() as f64 * args.erase_ratio.clamp(0.0, 1.0)) as usize;
    for &key in &keys[..to_erase] {
        chained.erase(key);
        probing.erase(key);
    }

    println!(
        "Inserted {} keys, erased {}, {} remain",
        keys.len(),
        to_erase,
        chained.len()
    );

    println!();
    println!("--- separate chaining ---");
    chained.strategy().debug_stats().print();
    chained.strategy().probe_histogram().print();

    println!();
    println!("--- open addressing ---");
    probing.strategy().debug_stats().print();
    probing.strategy().probe_histogram().print();
}
