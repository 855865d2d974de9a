use std::mem;

use crate::error::{MapError, Result};
use crate::hash::{HashStrategy, Murmur3Hash};
use crate::probe::{LinearProbe, ProbeStrategy};

/// Capacity used by `IntLongMap::new`.
pub const DEFAULT_CAPACITY: i32 = 16;

/// Smallest capacity the map will allocate.
pub const MIN_CAPACITY: i32 = 4;

/// Load factor used when none is given.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Largest capacity that is still a power of two in the positive i32 range.
const MAX_POW2_CAPACITY: usize = 1 << 30;

/// A hash map of `i32` keys to `i64` values, implemented with open
/// addressing.
///
/// All entries live in three parallel buffers (`keys`, `values`,
/// `occupied`), always sized to a power of two so the slot for a hash is
/// `hash & (capacity - 1)`. Collisions walk alternate slots via the
/// probing strategy. Once the number of assigned slots reaches
/// `capacity * load_factor` the buffers are doubled and every entry is
/// rehashed.
///
/// Hashing and probing are injected once at construction and cannot be
/// swapped afterwards; entries were placed under those strategies, so
/// switching them in place would orphan every existing slot. Use
/// [`rebuild_with`](IntLongMap::rebuild_with) to move the entries under
/// different strategies.
///
/// There is no removal and no iteration, and the map is not thread-safe.
/// `get` returns `0` for missing keys, so a stored zero value is
/// indistinguishable from absence without
/// [`contains_key`](IntLongMap::contains_key).
///
/// # Example
///
/// ```
/// use intmap::IntLongMap;
///
/// let mut map = IntLongMap::new();
/// assert_eq!(map.put(7, 700).unwrap(), 0);
/// assert_eq!(map.put(7, 900).unwrap(), 700);
/// assert_eq!(map.get(7), 900);
/// assert!(map.contains_key(7));
/// assert_eq!(map.len(), 1);
/// ```
#[derive(Debug)]
pub struct IntLongMap<H = Murmur3Hash, P = LinearProbe> {
    /// Hash-indexed buffer holding all keys.
    keys: Box<[i32]>,
    /// Values associated to the keys at the same slot.
    values: Box<[i64]>,
    /// Whether the slot holds a live entry; `keys`/`values` are only
    /// meaningful where this is true.
    occupied: Box<[bool]>,
    /// Cached number of occupied slots.
    assigned: usize,
    /// Occupancy at which the buffers must be reallocated.
    resize_threshold: usize,
    load_factor: f32,
    hash: H,
    probe: P,
}

impl IntLongMap {
    /// Creates a map with the default capacity, load factor and strategies.
    pub fn new() -> Self {
        Self::with_parts(DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, Murmur3Hash, LinearProbe)
    }

    /// Creates a map with the given initial capacity, rounded up to the
    /// next power of two.
    pub fn with_capacity(initial_capacity: i32) -> Result<Self> {
        Self::with_strategies(initial_capacity, DEFAULT_LOAD_FACTOR, Murmur3Hash, LinearProbe)
    }

    /// Creates a map with the given initial capacity and load factor.
    pub fn with_capacity_and_load_factor(initial_capacity: i32, load_factor: f32) -> Result<Self> {
        Self::with_strategies(initial_capacity, load_factor, Murmur3Hash, LinearProbe)
    }
}

impl Default for IntLongMap {
    fn default() -> Self {
        Self::new()
    }
}

impl<H, P> IntLongMap<H, P>
where
    H: HashStrategy,
    P: ProbeStrategy,
{
    /// Creates a map with the given capacity, load factor, hashing
    /// strategy and probing strategy.
    ///
    /// The capacity must be positive and the load factor in `(0, 1]`, or
    /// construction fails with [`MapError::InvalidArgument`].
    pub fn with_strategies(
        initial_capacity: i32,
        load_factor: f32,
        hash: H,
        probe: P,
    ) -> Result<Self> {
        if initial_capacity < 1 {
            return Err(MapError::InvalidArgument(format!(
                "initial capacity must be in (0, {}], got {initial_capacity}",
                i32::MAX
            )));
        }
        if !(load_factor > 0.0 && load_factor <= 1.0) {
            return Err(MapError::InvalidArgument(format!(
                "load factor must be in (0, 1], got {load_factor}"
            )));
        }
        Ok(Self::with_parts(initial_capacity, load_factor, hash, probe))
    }

    /// Allocates the buffers for validated parameters.
    fn with_parts(initial_capacity: i32, load_factor: f32, hash: H, probe: P) -> Self {
        let capacity = round_capacity(initial_capacity);
        Self {
            keys: vec![0; capacity].into_boxed_slice(),
            values: vec![0; capacity].into_boxed_slice(),
            occupied: vec![false; capacity].into_boxed_slice(),
            assigned: 0,
            resize_threshold: threshold(capacity, load_factor),
            load_factor,
            hash,
            probe,
        }
    }

    /// Returns the number of key-value pairs in the map.
    pub fn len(&self) -> usize {
        self.assigned
    }

    /// Returns true if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.assigned == 0
    }

    /// Returns the current slot capacity of the map.
    pub fn capacity(&self) -> usize {
        self.occupied.len()
    }

    /// Returns the load factor the map was constructed with.
    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    /// Stores `value` under `key`, returning the value previously stored
    /// there, or `0` if the key was new.
    ///
    /// Fails with [`MapError::CapacityExceeded`] once growth would pass
    /// the positive i32 range, and with [`MapError::ProbeExhausted`] if
    /// the probing strategy cannot reach a free slot.
    pub fn put(&mut self, key: i32, value: i64) -> Result<i64> {
        if self.assigned >= self.resize_threshold {
            self.expand_and_rehash()?;
        }

        match self.find_slot(key) {
            Ok(slot) => {
                let old = self.values[slot];
                self.values[slot] = value;
                Ok(old)
            }
            Err(slot) if slot < self.capacity() => {
                self.occupied[slot] = true;
                self.keys[slot] = key;
                self.values[slot] = value;
                self.assigned += 1;
                Ok(0)
            }
            Err(_) => Err(MapError::ProbeExhausted {
                capacity: self.capacity(),
            }),
        }
    }

    /// Returns the value stored under `key`, or `0` if the key is absent.
    pub fn get(&self, key: i32) -> i64 {
        match self.find_slot(key) {
            Ok(slot) => self.values[slot],
            Err(_) => 0,
        }
    }

    /// Returns whether `key` is present.
    pub fn contains_key(&self, key: i32) -> bool {
        self.find_slot(key).is_ok()
    }

    /// Moves every entry into a fresh map using the given strategies.
    ///
    /// This is the only supported way to change strategies: entries are
    /// re-inserted from scratch, so their slots are consistent with the
    /// new hash.
    pub fn rebuild_with<H2, P2>(self, hash: H2, probe: P2) -> Result<IntLongMap<H2, P2>>
    where
        H2: HashStrategy,
        P2: ProbeStrategy,
    {
        let mut rebuilt =
            IntLongMap::with_parts(self.capacity() as i32, self.load_factor, hash, probe);
        for slot in 0..self.occupied.len() {
            if self.occupied[slot] {
                rebuilt.put(self.keys[slot], self.values[slot])?;
            }
        }
        Ok(rebuilt)
    }

    /// Finds the slot for a key: `Ok(slot)` if the key is present,
    /// `Err(slot)` with the first free slot of its probe sequence if not.
    /// `Err(capacity)` means the walk visited `capacity` slots without
    /// hitting a free one, which only a non-permutation probing strategy
    /// can produce.
    fn find_slot(&self, key: i32) -> std::result::Result<usize, usize> {
        let capacity = self.capacity();
        let mask = capacity - 1;
        let mut slot = self.hash_key(key) & mask;

        for _ in 0..capacity {
            if !self.occupied[slot] {
                return Err(slot);
            }
            if self.keys[slot] == key {
                return Ok(slot);
            }
            slot = self.probe.probe(slot) & mask;
        }

        Err(capacity)
    }

    fn hash_key(&self, key: i32) -> usize {
        self.hash.hash(key) as u32 as usize
    }

    /// Doubles the buffers and relocates every entry under the new mask.
    ///
    /// Pure relocation: the old keys are all distinct, so each walk stops
    /// at the first free slot and `assigned` is untouched.
    fn expand_and_rehash(&mut self) -> Result<()> {
        let new_capacity = next_capacity(self.capacity())?;

        let old_keys = mem::replace(&mut self.keys, vec![0; new_capacity].into_boxed_slice());
        let old_values = mem::replace(&mut self.values, vec![0; new_capacity].into_boxed_slice());
        let old_occupied =
            mem::replace(&mut self.occupied, vec![false; new_capacity].into_boxed_slice());
        self.resize_threshold = threshold(new_capacity, self.load_factor);

        let mask = new_capacity - 1;
        for i in 0..old_occupied.len() {
            if !old_occupied[i] {
                continue;
            }
            let key = old_keys[i];
            let mut slot = self.hash_key(key) & mask;
            let mut probes = 0;
            while self.occupied[slot] {
                probes += 1;
                if probes >= new_capacity {
                    return Err(MapError::ProbeExhausted {
                        capacity: new_capacity,
                    });
                }
                slot = self.probe.probe(slot) & mask;
            }
            self.occupied[slot] = true;
            self.keys[slot] = key;
            self.values[slot] = old_values[i];
        }
        Ok(())
    }
}

/// Occupancy at which the buffers must grow.
fn threshold(capacity: usize, load_factor: f32) -> usize {
    (capacity as f32 * load_factor) as usize
}

/// Rounds a requested capacity to the next allowed power of two. Requests
/// past the largest representable power of two clamp to `i32::MAX`.
fn round_capacity(requested: i32) -> usize {
    let requested = requested as usize;
    if requested > MAX_POW2_CAPACITY {
        return i32::MAX as usize;
    }
    requested.next_power_of_two().max(MIN_CAPACITY as usize)
}

/// Returns the doubled capacity, keeping the power-of-two invariant.
fn next_capacity(current: usize) -> Result<usize> {
    if !current.is_power_of_two() {
        return Err(MapError::CapacityNotPowerOfTwo(current));
    }
    if current >= MAX_POW2_CAPACITY {
        return Err(MapError::CapacityExceeded);
    }
    Ok(current.max(MIN_CAPACITY as usize / 2) << 1)
}
