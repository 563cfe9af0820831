/// STL import (binary and ASCII) into a flat-colored scene
use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{count, many0},
    number::complete::{float, le_f32, le_u16, le_u32},
    sequence::{preceded, tuple},
    IResult,
};

use crate::camera::Camera;
use crate::error::SceneError;
use crate::geometry::{Color, Face, Scene, Vertex};
use crate::projection::ViewSurface;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

type Corners = [Vertex; 3];

/// Detect the STL flavor and build a scene where every facet has `color`
pub fn parse_stl(data: &[u8], color: Color) -> Result<Scene, SceneError> {
    if data.starts_with(b"solid") {
        // Binary files may also begin with "solid" in their header
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(scene) = parse_ascii_stl(text, color) {
                return Ok(scene);
            }
        }
    }

    parse_binary_stl(data, color)
}

pub fn parse_binary_stl(data: &[u8], color: Color) -> Result<Scene, SceneError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(SceneError::Stl("file too small to be a binary STL".into()));
    }

    let (body, facet_count) =
        binary_header(data).map_err(|e| SceneError::Stl(format!("bad header: {:?}", e)))?;
    let facet_count = facet_count as usize;
    if body.len() < facet_count * FACET_LEN {
        return Err(SceneError::Stl(format!(
            "header promises {} facets but only {} bytes follow",
            facet_count,
            body.len()
        )));
    }

    let (_, facets) = count(binary_facet, facet_count)(body)
        .map_err(|e| SceneError::Stl(format!("bad facet: {:?}", e)))?;
    build_scene(facets, color)
}

pub fn parse_ascii_stl(input: &str, color: Color) -> Result<Scene, SceneError> {
    let (_, facets) =
        ascii_solid(input).map_err(|e| SceneError::Stl(format!("bad ASCII STL: {:?}", e)))?;
    build_scene(facets, color)
}

fn build_scene(facets: Vec<Corners>, color: Color) -> Result<Scene, SceneError> {
    let faces = (0..facets.len())
        .map(|i| Face::new(3 * i, 3 * i + 1, 3 * i + 2, color))
        .collect();
    let vertices = facets.into_iter().flatten().collect();
    Scene::new(vertices, faces)
}

fn binary_header(input: &[u8]) -> IResult<&[u8], u32> {
    preceded(take(HEADER_LEN), le_u32)(input)
}

fn binary_point(input: &[u8]) -> IResult<&[u8], Vertex> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Vertex::new(x, y, z)))
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Corners> {
    // Stored normals are ignored; faces are flat-colored
    let (input, _normal) = binary_point(input)?;
    let (input, (a, b, c)) = tuple((binary_point, binary_point, binary_point))(input)?;
    let (input, _attributes) = le_u16(input)?;
    Ok((input, [a, b, c]))
}

fn ascii_solid(input: &str) -> IResult<&str, Vec<Corners>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _name) = not_line_ending(input)?;
    let (input, facets) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    Ok((input, facets))
}

fn ascii_facet(input: &str) -> IResult<&str, Corners> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = ascii_triple(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, (a, b, c)) = tuple((ascii_vertex, ascii_vertex, ascii_vertex))(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;
    Ok((input, [a, b, c]))
}

fn ascii_vertex(input: &str) -> IResult<&str, Vertex> {
    preceded(multispace0, preceded(tag("vertex"), ascii_triple))(input)
}

fn ascii_triple(input: &str) -> IResult<&str, Vertex> {
    let (input, x) = preceded(multispace0, float)(input)?;
    let (input, y) = preceded(multispace1, float)(input)?;
    let (input, z) = preceded(multispace1, float)(input)?;
    Ok((input, Vertex::new(x, y, z)))
}

/// Camera and view surface that frame the whole scene.
///
/// The camera looks along +z from in front of the bounding box; the surface
/// sits one unit ahead with limits matching the aspect ratio of `resolution`.
pub fn framing_for(scene: &Scene, (width, height): (usize, usize)) -> Result<(Camera, ViewSurface), SceneError> {
    let (half_w, half_h) = if width >= height {
        (width as f32 / height.max(1) as f32, 1.0)
    } else {
        (1.0, height as f32 / width.max(1) as f32)
    };
    let surface = ViewSurface::new(Vector3::z(), [-half_w, half_w, -half_h, half_h], width, height)?;

    let camera = match scene.bounds() {
        Some((min, max)) => {
            let center = nalgebra::center(&min, &max);
            let radius = ((max - min).norm() / 2.0).max(f32::EPSILON);
            Camera::with_angles(
                Point3::new(center.x, center.y, center.z - 2.5 * radius),
                Vector3::zeros(),
            )
        }
        None => Camera::new(),
    };

    Ok((camera, surface))
}
