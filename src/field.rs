//! N×N simulation grids and the ping/pong double-buffer used by the
//! phase evolver and the FFT scratch buffers.

use bytemuck::Pod;

/// Square grid of Pod texels, row-major, tightly packed.
///
/// Texels are `bytemuck::Pod` so a field can be handed to a GPU upload path
/// as raw bytes without conversion.
#[derive(Debug, Clone)]
pub struct Field<T: Pod> {
    resolution: usize,
    data: Vec<T>,
}

impl<T: Pod> Field<T> {
    /// Allocate a zero-filled `resolution` × `resolution` field.
    ///
    /// Allocation failure is surfaced as an error so the caller can retry
    /// with a smaller resolution instead of aborting.
    pub fn new(resolution: usize) -> Result<Self, String> {
        let len = resolution
            .checked_mul(resolution)
            .ok_or_else(|| format!("field resolution {} overflows", resolution))?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|e| format!("failed to allocate {0}x{0} field: {1}", resolution, e))?;
        data.resize(len, T::zeroed());

        Ok(Self { resolution, data })
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.resolution && y < self.resolution);
        y * self.resolution + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let i = self.index(x, y);
        self.data[i] = value;
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Raw texel bytes, suitable for a texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}

/// Two same-sized buffers plus a single role flag.
///
/// `front` is the buffer most recently written; `split` hands out the front
/// for reading and the back for writing. The flag is an index toggle, never
/// an aliased pointer, so buffer roles cannot be mutated out of order.
#[derive(Debug)]
pub struct PingPong<T: Pod> {
    slots: [Field<T>; 2],
    front: usize,
}

impl<T: Pod> PingPong<T> {
    pub fn new(resolution: usize) -> Result<Self, String> {
        Ok(Self {
            slots: [Field::new(resolution)?, Field::new(resolution)?],
            front: 0,
        })
    }

    pub fn resolution(&self) -> usize {
        self.slots[0].resolution()
    }

    /// The buffer holding the most recently completed output.
    pub fn front(&self) -> &Field<T> {
        &self.slots[self.front]
    }

    pub fn front_mut(&mut self) -> &mut Field<T> {
        &mut self.slots[self.front]
    }

    /// Borrow (front, back) disjointly: read the completed buffer, write the
    /// other. The buffer being written is never readable through this pair.
    pub fn split(&mut self) -> (&Field<T>, &mut Field<T>) {
        let (lo, hi) = self.slots.split_at_mut(1);
        if self.front == 0 {
            (&lo[0], &mut hi[0])
        } else {
            (&hi[0], &mut lo[0])
        }
    }

    /// Flip the role flag after a stage has fully written the back buffer.
    pub fn swap(&mut self) {
        self.front ^= 1;
    }
}
