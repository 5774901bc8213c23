use image::{Rgba, RgbaImage};
use log::info;
use wgpu;

pub const LAYER_SIZE: u32 = 64;

/// Surface pattern applied on top of a prop's color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Material {
    Plain,
    WhiteCube,
    Grass,
}

impl Material {
    pub const ALL: [Material; 3] = [Material::Plain, Material::WhiteCube, Material::Grass];

    pub fn layer(self) -> u32 {
        match self {
            Material::Plain => 0,
            Material::WhiteCube => 1,
            Material::Grass => 2,
        }
    }

    /// Builds the texel data for this material's layer.
    pub fn generate(self) -> RgbaImage {
        match self {
            Material::Plain => RgbaImage::from_pixel(LAYER_SIZE, LAYER_SIZE, Rgba([255, 255, 255, 255])),
            Material::WhiteCube => RgbaImage::from_fn(LAYER_SIZE, LAYER_SIZE, |x, y| {
                let edge = LAYER_SIZE - 1 - BORDER;
                if x < BORDER || y < BORDER || x > edge || y > edge {
                    Rgba([214, 214, 214, 255])
                } else {
                    Rgba([255, 255, 255, 255])
                }
            }),
            Material::Grass => RgbaImage::from_fn(LAYER_SIZE, LAYER_SIZE, |x, y| {
                let coarse = value_noise(x as i32 / 4, y as i32 / 4, 7);
                let fine = value_noise(x as i32, y as i32, 13);
                let shade = 0.55 + 0.3 * coarse + 0.15 * fine;
                let green = (200.0 * shade) as u8;
                Rgba([(70.0 * shade) as u8, green, (40.0 * shade) as u8, 255])
            }),
        }
    }
}

const BORDER: u32 = 2;

fn value_noise(x: i32, z: i32, seed: u32) -> f32 {
    let n = x
        .wrapping_mul(374761393)
        .wrapping_add(z.wrapping_mul(668265263))
        .wrapping_add((seed as i32).wrapping_mul(31));
    let n = (n ^ (n >> 13)).wrapping_mul(1274126177);
    ((n & 0x7fffffff) as f32) / 0x7fffffff as f32
}

pub struct Texture {
    pub texture: wgpu::Texture,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl Texture {
    /// Uploads every [`Material`] as one layer of a 2D texture array.
    pub fn create_material_array(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let layers: Vec<RgbaImage> = Material::ALL.iter().map(|m| m.generate()).collect();

        let texture_size = wgpu::Extent3d {
            width: LAYER_SIZE,
            height: LAYER_SIZE,
            depth_or_array_layers: layers.len() as u32,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            size: texture_size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            label: Some("Material Texture Array"),
            view_formats: &[],
        });

        for (i, img) in layers.iter().enumerate() {
            queue.write_texture(
                wgpu::ImageCopyTexture {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d { x: 0, y: 0, z: i as u32 },
                    aspect: wgpu::TextureAspect::All,
                },
                img,
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * LAYER_SIZE),
                    rows_per_image: Some(LAYER_SIZE),
                },
                wgpu::Extent3d {
                    width: LAYER_SIZE,
                    height: LAYER_SIZE,
                    depth_or_array_layers: 1,
                },
            );
        }
        info!("[texture] Uploaded {} material layers ({}x{})", layers.len(), LAYER_SIZE, LAYER_SIZE);

        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor {
            dimension: Some(wgpu::TextureViewDimension::D2Array),
            ..Default::default()
        });
        let texture_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2Array,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture_sampler),
                },
            ],
        });

        Self {
            texture,
            bind_group,
            bind_group_layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_are_distinct_and_ordered() {
        let layers: Vec<u32> = Material::ALL.iter().map(|m| m.layer()).collect();
        assert_eq!(layers, vec![0, 1, 2]);
    }

    #[test]
    fn white_cube_has_darker_border() {
        let img = Material::WhiteCube.generate();
        assert_eq!(img.dimensions(), (LAYER_SIZE, LAYER_SIZE));
        assert!(img.get_pixel(0, 0)[0] < 255);
        assert_eq!(img.get_pixel(LAYER_SIZE / 2, LAYER_SIZE / 2)[0], 255);
    }

    #[test]
    fn grass_is_green_and_deterministic() {
        let a = Material::Grass.generate();
        let b = Material::Grass.generate();
        assert_eq!(a, b);
        for pixel in a.pixels() {
            assert!(pixel[1] > pixel[0] && pixel[1] > pixel[2]);
        }
    }
}
