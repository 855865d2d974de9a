use intmap::{IntLongMap, LinearProbe, SpreadHash, XorShiftHash};

fn main() -> intmap::Result<()> {
    let mut map = IntLongMap::with_capacity(64)?;
    for i in 0..1000 {
        map.put(i, i as i64 * i as i64)?;
    }
    println!(
        "{} entries, capacity {}, load factor {}",
        map.len(),
        map.capacity(),
        map.load_factor()
    );
    println!("25 -> {}", map.get(25));

    // Strategies are fixed at construction; moving entries under different
    // ones means rebuilding the map.
    let map = map.rebuild_with(XorShiftHash, LinearProbe)?;
    println!("rebuilt under xorshift: 25 -> {}", map.get(25));

    let mut spread = IntLongMap::with_strategies(64, 0.5, SpreadHash, LinearProbe)?;
    spread.put(25, 625)?;
    println!("spread hash map: 25 -> {}", spread.get(25));
    Ok(())
}
