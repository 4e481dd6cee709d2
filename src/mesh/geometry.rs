use glam::Vec3;

/// Floats per vertex in the GPU buffer
pub const VERTEX_FLOATS: usize = 6;

/// A vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }

    /// Convert to flat array for WebGL buffer
    /// Layout: position(3) + normal(3)
    pub fn to_array(&self) -> [f32; VERTEX_FLOATS] {
        [
            self.position.x, self.position.y, self.position.z,
            self.normal.x, self.normal.y, self.normal.z,
        ]
    }
}

/// A mesh composed of vertices and triangle indices
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add vertices and return the starting index
    pub fn add_vertices(&mut self, verts: impl IntoIterator<Item = Vertex>) -> u32 {
        let start = self.vertices.len() as u32;
        self.vertices.extend(verts);
        start
    }

    /// Add a triangle (indices are relative to the mesh's vertex buffer)
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.push(a);
        self.indices.push(b);
        self.indices.push(c);
    }

    /// Add a quad as two triangles (CCW winding)
    pub fn add_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.add_triangle(a, b, c);
        self.add_triangle(a, c, d);
    }

    /// Get vertex buffer data as flat f32 array
    pub fn vertex_data(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| v.to_array())
            .collect()
    }

    pub fn index_data(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Largest distance of any vertex from the origin
    pub fn extent(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| v.position.length())
            .fold(0.0, f32::max)
    }
}

/// Ring of `segments + 1` vertices around the y axis; the seam vertex is
/// duplicated so every column has its own normal.
pub fn create_ring(y: f32, radius: f32, segments: usize, normal_y: f32) -> Vec<Vertex> {
    (0..=segments)
        .map(|i| {
            let angle = (i as f32 / segments as f32) * std::f32::consts::TAU;
            let (sin_a, cos_a) = angle.sin_cos();

            let position = Vec3::new(sin_a * radius, y, cos_a * radius);
            let normal = Vec3::new(sin_a, normal_y, cos_a).normalize_or_zero();

            Vertex::new(position, normal)
        })
        .collect()
}

/// Connect two rings created by [`create_ring`], `upper` above `lower`
pub fn connect_rings(mesh: &mut Mesh, upper: u32, lower: u32, segments: usize) {
    for i in 0..segments as u32 {
        let a = upper + i;
        let b = lower + i;
        let c = lower + i + 1;
        let d = upper + i + 1;

        mesh.add_quad(a, b, c, d);
    }
}
