use std::fs;
use std::io::{self, BufWriter, Write as _};
use std::path::Path;
use timecube_core::{Colors, Normals, PointCloud};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlyFormat {
    Ascii,
    BinaryLittleEndian,
}

/// Property type as declared in the PLY header.
#[derive(Debug, Clone, Copy)]
enum PropType {
    Float,
    Uchar,
}

impl PropType {
    fn byte_size(self) -> usize {
        match self {
            PropType::Float => 4,
            PropType::Uchar => 1,
        }
    }
}

/// Parsed header information.
///
/// Timecube files come in two layouts: the basic one
/// (`x y z red green blue`) and the extended one the original converter
/// emitted (`x y z nx ny nz red green blue alpha`, normals all zero).
/// Properties are located by name, so both parse through the same path.
struct PlyHeader {
    format: PlyFormat,
    vertex_count: usize,
    property_names: Vec<String>,
    property_types: Vec<PropType>,
    header_end_offset: usize, // byte offset just after "end_header\n"
}

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn parse_ply_header(data: &[u8]) -> io::Result<PlyHeader> {
    let end_marker = b"end_header\n";
    let header_end =
        find_bytes(data, end_marker).ok_or_else(|| invalid("missing end_header in PLY file"))?;
    let header_end_offset = header_end + end_marker.len();

    let header_text = std::str::from_utf8(&data[..header_end])
        .map_err(|_| invalid("PLY header not valid UTF-8"))?;

    let mut format = None;
    let mut vertex_count: usize = 0;
    let mut property_names: Vec<String> = Vec::new();
    let mut property_types: Vec<PropType> = Vec::new();
    let mut in_vertex_element = false;
    let mut seen_ply_magic = false;

    for line in header_text.lines() {
        let line = line.trim();

        if !seen_ply_magic {
            if line == "ply" {
                seen_ply_magic = true;
                continue;
            } else {
                return Err(invalid("file does not start with 'ply'"));
            }
        }

        if line.starts_with("format") {
            if line.contains("ascii") {
                format = Some(PlyFormat::Ascii);
            } else if line.contains("binary_little_endian") {
                format = Some(PlyFormat::BinaryLittleEndian);
            } else {
                return Err(io::Error::new(
                    io::ErrorKind::Unsupported,
                    format!("unsupported PLY format: {}", line),
                ));
            }
        } else if line.starts_with("element vertex") {
            in_vertex_element = true;
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 3 {
                return Err(invalid("invalid element vertex line"));
            }
            vertex_count = parts[2]
                .parse::<usize>()
                .map_err(|e| invalid(format!("invalid vertex count: {}", e)))?;
        } else if line.starts_with("element") {
            // e.g. the converter's `element face 0`; properties that follow
            // belong to it, not to vertices.
            in_vertex_element = false;
        } else if line.starts_with("property") && in_vertex_element {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() >= 3 {
                let ptype = match parts[1] {
                    "float" | "float32" | "double" | "float64" => PropType::Float,
                    "uchar" | "uint8" => PropType::Uchar,
                    other => {
                        return Err(io::Error::new(
                            io::ErrorKind::Unsupported,
                            format!("unsupported property type: {}", other),
                        ));
                    }
                };
                property_types.push(ptype);
                property_names.push(parts[2].to_string());
            }
        }
    }

    let format = format.ok_or_else(|| invalid("PLY format line missing"))?;

    Ok(PlyHeader {
        format,
        vertex_count,
        property_names,
        property_types,
        header_end_offset,
    })
}

/// Read a point cloud from a PLY file.
///
/// Accepts ascii and binary_little_endian encodings, with or without the
/// extended normal/alpha properties. Any malformed input (missing
/// `end_header`, missing x/y/z, short vertex lines, truncated body, fewer
/// vertices than the header promises) is rejected with `InvalidData` and no
/// partial cloud is returned; callers keep whatever cloud they had.
pub fn read_ply(path: impl AsRef<Path>) -> io::Result<PointCloud> {
    let data = fs::read(&path)?;
    let header = parse_ply_header(&data)?;

    let idx_x = header.property_names.iter().position(|n| n == "x");
    let idx_y = header.property_names.iter().position(|n| n == "y");
    let idx_z = header.property_names.iter().position(|n| n == "z");

    let (idx_x, idx_y, idx_z) = match (idx_x, idx_y, idx_z) {
        (Some(ix), Some(iy), Some(iz)) => (ix, iy, iz),
        _ => return Err(invalid("PLY file missing required x, y, z properties")),
    };

    let idx_nx = header.property_names.iter().position(|n| n == "nx");
    let idx_ny = header.property_names.iter().position(|n| n == "ny");
    let idx_nz = header.property_names.iter().position(|n| n == "nz");

    let idx_red = header.property_names.iter().position(|n| n == "red");
    let idx_green = header.property_names.iter().position(|n| n == "green");
    let idx_blue = header.property_names.iter().position(|n| n == "blue");

    let has_normals = idx_nx.is_some() && idx_ny.is_some() && idx_nz.is_some();
    let has_colors = idx_red.is_some() && idx_green.is_some() && idx_blue.is_some();

    let vertex_count = header.vertex_count;

    let mut x = Vec::with_capacity(vertex_count);
    let mut y = Vec::with_capacity(vertex_count);
    let mut z = Vec::with_capacity(vertex_count);
    let mut nx_vec = Vec::with_capacity(if has_normals { vertex_count } else { 0 });
    let mut ny_vec = Vec::with_capacity(if has_normals { vertex_count } else { 0 });
    let mut nz_vec = Vec::with_capacity(if has_normals { vertex_count } else { 0 });
    let mut r_vec = Vec::with_capacity(if has_colors { vertex_count } else { 0 });
    let mut g_vec = Vec::with_capacity(if has_colors { vertex_count } else { 0 });
    let mut b_vec = Vec::with_capacity(if has_colors { vertex_count } else { 0 });

    match header.format {
        PlyFormat::Ascii => {
            let body = std::str::from_utf8(&data[header.header_end_offset..])
                .map_err(|_| invalid("PLY body not valid UTF-8"))?;
            let mut count = 0usize;
            for line in body.lines() {
                if count >= vertex_count {
                    break;
                }
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() < header.property_names.len() {
                    return Err(invalid(format!(
                        "vertex line has {} fields, expected {}",
                        parts.len(),
                        header.property_names.len()
                    )));
                }

                let parse_f32 = |idx: usize| -> io::Result<f32> {
                    parts[idx]
                        .parse::<f32>()
                        .map_err(|e| invalid(format!("failed to parse float: {}", e)))
                };

                x.push(parse_f32(idx_x)?);
                y.push(parse_f32(idx_y)?);
                z.push(parse_f32(idx_z)?);

                if has_normals {
                    nx_vec.push(parse_f32(idx_nx.unwrap())?);
                    ny_vec.push(parse_f32(idx_ny.unwrap())?);
                    nz_vec.push(parse_f32(idx_nz.unwrap())?);
                }

                if has_colors {
                    let parse_u8 = |idx: usize| -> io::Result<u8> {
                        parts[idx]
                            .parse::<u8>()
                            .map_err(|e| invalid(format!("failed to parse color byte: {}", e)))
                    };
                    r_vec.push(parse_u8(idx_red.unwrap())?);
                    g_vec.push(parse_u8(idx_green.unwrap())?);
                    b_vec.push(parse_u8(idx_blue.unwrap())?);
                }

                count += 1;
            }

            if count < vertex_count {
                return Err(invalid(format!(
                    "PLY body has {} vertices, header promised {}",
                    count, vertex_count
                )));
            }
        }
        PlyFormat::BinaryLittleEndian => {
            let body = &data[header.header_end_offset..];
            let stride: usize = header.property_types.iter().map(|t| t.byte_size()).sum();
            let needed = vertex_count * stride;
            if body.len() < needed {
                return Err(invalid(format!(
                    "PLY binary body too short: need {} bytes, got {}",
                    needed,
                    body.len()
                )));
            }

            // Byte offset of each property within a vertex record.
            let offsets: Vec<usize> = header
                .property_types
                .iter()
                .scan(0usize, |acc, t| {
                    let off = *acc;
                    *acc += t.byte_size();
                    Some(off)
                })
                .collect();

            for vi in 0..vertex_count {
                let row = &body[vi * stride..];
                let read_f32_at = |prop_idx: usize| -> f32 {
                    let off = offsets[prop_idx];
                    f32::from_le_bytes([row[off], row[off + 1], row[off + 2], row[off + 3]])
                };
                let read_u8_at = |prop_idx: usize| -> u8 { row[offsets[prop_idx]] };

                x.push(read_f32_at(idx_x));
                y.push(read_f32_at(idx_y));
                z.push(read_f32_at(idx_z));

                if has_normals {
                    nx_vec.push(read_f32_at(idx_nx.unwrap()));
                    ny_vec.push(read_f32_at(idx_ny.unwrap()));
                    nz_vec.push(read_f32_at(idx_nz.unwrap()));
                }

                if has_colors {
                    r_vec.push(read_u8_at(idx_red.unwrap()));
                    g_vec.push(read_u8_at(idx_green.unwrap()));
                    b_vec.push(read_u8_at(idx_blue.unwrap()));
                }
            }
        }
    }

    let mut cloud = PointCloud::from_xyz(x, y, z);

    if has_normals {
        cloud.normals = Some(Normals {
            nx: nx_vec,
            ny: ny_vec,
            nz: nz_vec,
        });
    }

    if has_colors {
        cloud.colors = Some(Colors {
            r: r_vec,
            g: g_vec,
            b: b_vec,
        });
    }

    Ok(cloud)
}

/// Write a PLY file in ASCII format, basic variant.
///
/// Emits `x y z` plus `red green blue` when the cloud has a color channel.
/// This is the writer's one fixed layout; use
/// [`write_ply_extended`] for files meant to match the original converter's
/// 10-property output.
pub fn write_ply(path: impl AsRef<Path>, cloud: &PointCloud) -> io::Result<()> {
    let mut out = String::new();

    out.push_str("ply\n");
    out.push_str("format ascii 1.0\n");
    out.push_str(&format!("element vertex {}\n", cloud.len()));
    out.push_str("property float x\n");
    out.push_str("property float y\n");
    out.push_str("property float z\n");

    if cloud.colors.is_some() {
        out.push_str("property uchar red\n");
        out.push_str("property uchar green\n");
        out.push_str("property uchar blue\n");
    }

    out.push_str("end_header\n");

    for i in 0..cloud.len() {
        out.push_str(&format!("{} {} {}", cloud.x[i], cloud.y[i], cloud.z[i]));

        if let Some(ref colors) = cloud.colors {
            out.push_str(&format!(" {} {} {}", colors.r[i], colors.g[i], colors.b[i]));
        }

        out.push('\n');
    }

    fs::write(path, out)
}

/// Write a PLY file in ASCII format, extended variant.
///
/// Matches the layout the original video converter produced: zeroed normals
/// and a constant 255 alpha between the position and color columns. Useful
/// when downstream tooling expects that exact 10-field layout.
pub fn write_ply_extended(path: impl AsRef<Path>, cloud: &PointCloud) -> io::Result<()> {
    let file = fs::File::create(path)?;
    let mut w = BufWriter::new(file);

    w.write_all(b"ply\n")?;
    w.write_all(b"format ascii 1.0\n")?;
    writeln!(w, "element vertex {}", cloud.len())?;
    w.write_all(b"property float x\n")?;
    w.write_all(b"property float y\n")?;
    w.write_all(b"property float z\n")?;
    w.write_all(b"property float nx\n")?;
    w.write_all(b"property float ny\n")?;
    w.write_all(b"property float nz\n")?;
    w.write_all(b"property uchar red\n")?;
    w.write_all(b"property uchar green\n")?;
    w.write_all(b"property uchar blue\n")?;
    w.write_all(b"property uchar alpha\n")?;
    w.write_all(b"end_header\n")?;

    for i in 0..cloud.len() {
        let (r, g, b) = match &cloud.colors {
            Some(c) => (c.r[i], c.g[i], c.b[i]),
            None => (255, 255, 255),
        };
        writeln!(
            w,
            "{} {} {} 0 0 0 {} {} {} 255",
            cloud.x[i], cloud.y[i], cloud.z[i], r, g, b
        )?;
    }

    w.flush()?;
    Ok(())
}

/// Write a PLY file in binary_little_endian format.
///
/// Binary PLY is ~3-4x smaller and faster to read/write than ASCII; worth it
/// for full-size timecubes (a 100x100x100 cube is a million points).
pub fn write_ply_binary(path: impl AsRef<Path>, cloud: &PointCloud) -> io::Result<()> {
    let file = fs::File::create(path)?;
    let mut w = BufWriter::new(file);

    w.write_all(b"ply\n")?;
    w.write_all(b"format binary_little_endian 1.0\n")?;
    writeln!(w, "element vertex {}", cloud.len())?;
    w.write_all(b"property float x\n")?;
    w.write_all(b"property float y\n")?;
    w.write_all(b"property float z\n")?;

    if cloud.colors.is_some() {
        w.write_all(b"property uchar red\n")?;
        w.write_all(b"property uchar green\n")?;
        w.write_all(b"property uchar blue\n")?;
    }

    w.write_all(b"end_header\n")?;

    for i in 0..cloud.len() {
        w.write_all(&cloud.x[i].to_le_bytes())?;
        w.write_all(&cloud.y[i].to_le_bytes())?;
        w.write_all(&cloud.z[i].to_le_bytes())?;

        if let Some(ref colors) = cloud.colors {
            w.write_all(&[colors.r[i]])?;
            w.write_all(&[colors.g[i]])?;
            w.write_all(&[colors.b[i]])?;
        }
    }

    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use timecube_core::PointCloud;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("timecube_io_test");
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    fn colored_cloud() -> PointCloud {
        let mut cloud = PointCloud::with_capacity(3);
        cloud.push_colored([0.0, 0.0, 0.0], [255, 0, 0]);
        cloud.push_colored([1.0, 0.0, 0.0], [0, 255, 0]);
        cloud.push_colored([0.0, 1.0, 2.0], [0, 0, 255]);
        cloud
    }

    #[test]
    fn ascii_roundtrip_preserves_points_and_colors() {
        let cloud = colored_cloud();
        let path = temp_path("roundtrip.ply");

        write_ply(&path, &cloud).unwrap();
        let loaded = read_ply(&path).unwrap();

        assert_eq!(loaded.len(), cloud.len());
        for i in 0..cloud.len() {
            assert!((loaded.x[i] - cloud.x[i]).abs() < 1e-4);
            assert!((loaded.y[i] - cloud.y[i]).abs() < 1e-4);
            assert!((loaded.z[i] - cloud.z[i]).abs() < 1e-4);
        }
        assert_eq!(loaded.colors, cloud.colors);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn extended_variant_roundtrips_through_reader() {
        let cloud = colored_cloud();
        let path = temp_path("extended.ply");

        write_ply_extended(&path, &cloud).unwrap();
        let loaded = read_ply(&path).unwrap();

        assert_eq!(loaded.len(), cloud.len());
        assert_eq!(loaded.colors, cloud.colors);
        // Converter-style normals come back as all zeros.
        let normals = loaded.normals.unwrap();
        assert!(normals.nx.iter().all(|&v| v == 0.0));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn binary_roundtrip() {
        let cloud = colored_cloud();
        let path = temp_path("binary.ply");

        write_ply_binary(&path, &cloud).unwrap();
        let loaded = read_ply(&path).unwrap();

        assert_eq!(loaded.len(), cloud.len());
        assert_eq!(loaded.x, cloud.x);
        assert_eq!(loaded.colors, cloud.colors);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn empty_cloud_roundtrip() {
        let path = temp_path("empty.ply");
        write_ply(&path, &PointCloud::new()).unwrap();
        let loaded = read_ply(&path).unwrap();
        assert_eq!(loaded.len(), 0);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_end_header_is_rejected() {
        let path = temp_path("no_end.ply");
        std::fs::write(&path, "ply\nformat ascii 1.0\nelement vertex 1\n").unwrap();
        let err = read_ply(&path).unwrap_err();
        assert!(err.to_string().contains("end_header"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn short_vertex_line_is_rejected() {
        let path = temp_path("short_line.ply");
        std::fs::write(
            &path,
            "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\nproperty float z\nproperty uchar red\nproperty uchar green\nproperty uchar blue\nend_header\n1 2 3 255\n",
        )
        .unwrap();
        let err = read_ply(&path).unwrap_err();
        assert!(err.to_string().contains("fields"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn undercount_body_is_rejected() {
        let path = temp_path("undercount.ply");
        std::fs::write(
            &path,
            "ply\nformat ascii 1.0\nelement vertex 3\nproperty float x\nproperty float y\nproperty float z\nend_header\n1 2 3\n",
        )
        .unwrap();
        let err = read_ply(&path).unwrap_err();
        assert!(err.to_string().contains("promised"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_xyz_is_rejected() {
        let path = temp_path("no_xyz.ply");
        std::fs::write(
            &path,
            "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\nend_header\n1 2\n",
        )
        .unwrap();
        assert!(read_ply(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn face_element_properties_are_not_vertex_properties() {
        // The original converter's header ends with `element face 0` and a
        // list property; neither may leak into the vertex layout.
        let path = temp_path("face_element.ply");
        std::fs::write(
            &path,
            "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\nproperty float z\nelement face 0\nproperty list uchar int vertex_indices\nend_header\n1 2 3\n",
        )
        .unwrap();
        let cloud = read_ply(&path).unwrap();
        assert_eq!(cloud.len(), 1);
        assert_eq!(cloud.point(0), [1.0, 2.0, 3.0]);
        let _ = std::fs::remove_file(&path);
    }
}
