// Uniformize colormaps and save them as tables.
//
//     ehtplot-tools [jobs.hjson]
//
// Without argument, produce ehthot.txt (linearized afmhot) and
// ehtRdBu.txt (symmetrized RdBu).  A job file looks like
//
//     {
//       preview: "preview.html"
//       jobs: [
//         { map: "afmhot", op: "linearize", n: 256, save: "ehthot.txt" }
//         { map: "RdBu", op: "symmetrize", vmid: 0.5, save: "ehtRdBu.txt" }
//       ]
//     }
//
// Jobs accept the options `n`, `lmin`, `lmid`, `lmax`, `vmin`, `vmid`
// and `vmax` of the corresponding operation.

use std::{string::String,
          env,
          io::{BufWriter, Write},
          fs::File,
          error::Error};
use serde_hjson::Value::{self, *};
use rgb::RGB;
use ehtplot::{Colormap, Linearize, Listed, Registry, Symmetrize};
use ehtplot::registry::Named;

type Err = Box<dyn Error>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Linearize,
    Symmetrize,
}

#[derive(Debug)]
struct Job {
    map: String,
    op: Op,
    n: usize,
    save: String,
    lmin: Option<f64>,
    lmid: Option<f64>,
    lmax: Option<f64>,
    vmin: Option<f64>,
    vmid: Option<f64>,
    vmax: Option<f64>,
}

impl Job {
    fn new(map: &str, op: Op, save: &str) -> Self {
        Job { map: map.to_string(), op, n: 256, save: save.to_string(),
              lmin: None, lmid: None, lmax: None,
              vmin: None, vmid: None, vmax: None }
    }
}

fn number(v: Option<&Value>, key: &str) -> Result<Option<f64>, Err> {
    match v {
        None | Some(Null) => Ok(None),
        Some(I64(i)) => Ok(Some(*i as f64)),
        Some(U64(u)) => Ok(Some(*u as f64)),
        Some(F64(x)) => Ok(Some(*x)),
        Some(v) => Err(format!("ehtplot-tools: {key} = {v:?} not a number").into()),
    }
}

fn string<'a>(v: Option<&'a Value>, key: &str) -> Result<&'a str, Err> {
    match v {
        Some(String(s)) => Ok(s.as_str()),
        v => Err(format!("ehtplot-tools: {key} = {v:?} not a string").into()),
    }
}

fn job_of_json(json: &Value) -> Result<Job, Err> {
    let m = match json {
        Object(m) => m,
        _ => return Err(format!("ehtplot-tools: job {json:?} not an object")
                        .into()),
    };
    let op = match string(m.get("op"), "op")? {
        "linearize" => Op::Linearize,
        "symmetrize" => Op::Symmetrize,
        op => return Err(format!("ehtplot-tools: unknown operation {op}").into()),
    };
    let mut job = Job::new(string(m.get("map"), "map")?, op,
                           string(m.get("save"), "save")?);
    if let Some(n) = number(m.get("n"), "n")? {
        if n < 0. || n.fract() != 0. {
            return Err(format!("ehtplot-tools: n = {n} is not a sample count")
                       .into())
        }
        job.n = n as usize;
    }
    job.lmin = number(m.get("lmin"), "lmin")?;
    job.lmid = number(m.get("lmid"), "lmid")?;
    job.lmax = number(m.get("lmax"), "lmax")?;
    job.vmin = number(m.get("vmin"), "vmin")?;
    job.vmid = number(m.get("vmid"), "vmid")?;
    job.vmax = number(m.get("vmax"), "vmax")?;
    Ok(job)
}

fn run(job: &Job, cm: &Named) -> Result<Listed, Err> {
    let colors = match job.op {
        Op::Linearize => {
            let mut lin = Linearize::new(job.n);
            if let Some(l) = job.lmin { lin = lin.lmin(l) }
            if let Some(l) = job.lmax { lin = lin.lmax(l) }
            if let Some(v) = job.vmin { lin = lin.vmin(v) }
            if let Some(v) = job.vmax { lin = lin.vmax(v) }
            lin.colors(cm)?
        }
        Op::Symmetrize => {
            let mut sym = Symmetrize::new(job.n);
            if let Some(l) = job.lmin { sym = sym.lmin(l) }
            if let Some(l) = job.lmid { sym = sym.lmid(l) }
            if let Some(l) = job.lmax { sym = sym.lmax(l) }
            if let Some(v) = job.vmin { sym = sym.vmin(v) }
            if let Some(v) = job.vmid { sym = sym.vmid(v) }
            if let Some(v) = job.vmax { sym = sym.vmax(v) }
            sym.colors(cm)?
        }
    };
    ehtplot::table::write(BufWriter::new(File::create(&job.save)?), &colors)?;
    Ok(Listed::new(colors)?)
}

fn css_string(c: RGB<f64>) -> String {
    let u = |x: f64| (255. * x).round() as u8;
    format!("#{:02x}{:02x}{:02x}", u(c.r), u(c.g), u(c.b))
}

/// Gray with the same perceptual lightness as `c`.
fn to_gray(c: RGB<f64>) -> RGB<f64> {
    let l = ehtplot::lightness(c);
    ehtplot::Builder::new().saturation(|_| 0.).darkest(l).lightest(l)
        .convert(0, 2)
        .unwrap_or(c)
}

fn strip(fh: &mut impl Write, cm: &impl Colormap, comment: &str)
         -> Result<(), Err> {
    let colors = Listed::sample(cm, 256)?;
    writeln!(fh, "<table style=\"border: 0px;  border-spacing: 0px\"><tr>")?;
    for &c in colors.colors() {
        writeln!(fh, "  <td style=\"width: 2px; height: 30px; \
                      background-color: {}\"></td>", css_string(c))?;
    }
    writeln!(fh, "<td rowspan=\"2\" style=\"padding-left: 7px\">\
                  {comment}</td></tr><tr>")?;
    for &c in colors.colors() {
        writeln!(fh, "  <td style=\"width: 2px; height: 12px; \
                      background-color: {}\"></td>", css_string(to_gray(c)))?;
    }
    writeln!(fh, "</tr></table><br/>")?;
    Ok(())
}

fn main() -> Result<(), Err> {
    env_logger::init();
    let (jobs, preview) = match env::args().nth(1) {
        Some(path) => {
            let json: Value = serde_hjson::from_reader(File::open(&path)?)?;
            let m = match json {
                Object(m) => m,
                _ => return Err(format!("ehtplot-tools: {path}: not an object")
                                .into()),
            };
            let jobs = match m.get("jobs") {
                Some(Array(a)) => a.iter().map(job_of_json)
                    .collect::<Result<Vec<_>, _>>()?,
                _ => return Err(format!("ehtplot-tools: {path}: no job list")
                                .into()),
            };
            let preview = match m.get("preview") {
                Some(String(p)) => Some(p.clone()),
                _ => None,
            };
            (jobs, preview)
        }
        None => (vec![Job::new("afmhot", Op::Linearize, "ehthot.txt"),
                      Job::new("RdBu", Op::Symmetrize, "ehtRdBu.txt")],
                 None),
    };

    let registry = Registry::builtin();
    let mut results = vec![];
    for job in &jobs {
        let cm = registry.get(&job.map)
            .ok_or_else(|| format!("ehtplot-tools: unknown colormap {}",
                                   job.map))?;
        let out = run(job, &cm)?;
        log::info!("{:?} {} → {} ({} colors)", job.op, job.map, job.save,
                   out.len());
        results.push((cm, out));
    }

    if let Some(preview) = preview {
        let mut fh = BufWriter::new(File::create(&preview)?);
        writeln!(fh, "<html>\n<head>\n<title>ehtplot colormaps</title>\n\
                      </head>\n<body>")?;
        for (job, (cm, out)) in jobs.iter().zip(&results) {
            writeln!(fh, "<h3>{}</h3>", job.map)?;
            strip(&mut fh, cm, "original")?;
            strip(&mut fh, out, &format!("{:?}d", job.op).to_lowercase())?;
        }
        writeln!(fh, "</body>\n</html>")?;
    }
    Ok(())
}
