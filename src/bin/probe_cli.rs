#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!(
        "probe_cli requires `--features cli`.\n\
         Example: cargo run --bin probe_cli --features cli -- list"
    );
    std::process::exit(1);
}

#[cfg(feature = "cli")]
fn main() {
    env_logger::init();
    if let Err(err) = native::run() {
        eprintln!("probe_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
mod native {
    use hull_probe::exercises::VectorExercise;
    use hull_probe::geom::{
        ContainmentOptions, ContainmentProbe, PointContainment, Quat, ReferencePoint, Transform,
        TriMesh, Vec3,
    };

    const USAGE: &str = r#"probe_cli (hull-probe)

USAGE:
  probe_cli list
  probe_cli run <scenario|all>
  probe_cli query <shape> <x> <y> <z> [options]
  probe_cli exercise <n> <ax> <ay> <az> <bx> <by> <bz> [t]

SHAPES:
  cube          unit cube, vertices at ±0.5
  tetrahedron   regular tetrahedron inside [-1, 1]³
  l_prism       non-convex L-shaped prism

OPTIONS (query):
  --position <x> <y> <z>      Transform position (default 0 0 0)
  --euler <x> <y> <z>         Rotation in degrees (default 0 0 0)
  --scale <s>                 Uniform scale (default 1)
  --reference <centroid|origin>
                              Interior reference for the face test (default centroid)
  --no-bounds                 Skip the bounding-box prefilter
  -h, --help                  Show this help

Set RUST_LOG=debug to see hull construction details.
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                print_scenarios();
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "query" => cmd_query(&mut args),
            "exercise" => cmd_exercise(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_scenarios() {
        for scenario in Scenario::ALL {
            println!("{:<32} {}", scenario.name(), scenario.description());
        }
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let scenario_name = args.next().ok_or("missing scenario name")?;
        if let Some(extra) = args.next() {
            return Err(format!("unexpected argument `{extra}`\n\n{USAGE}"));
        }

        if scenario_name == "all" {
            let mut failed = Vec::new();
            for scenario in Scenario::ALL {
                if !run_scenario(*scenario)? {
                    failed.push(scenario.name());
                }
            }
            if failed.is_empty() {
                println!("all {} scenarios passed", Scenario::ALL.len());
                return Ok(());
            }
            return Err(format!("failed scenarios: {}", failed.join(", ")));
        }

        let scenario =
            Scenario::from_str(&scenario_name).ok_or_else(|| unknown_scenario(&scenario_name))?;
        if run_scenario(scenario)? {
            Ok(())
        } else {
            Err(format!("scenario `{}` failed", scenario.name()))
        }
    }

    fn unknown_scenario(name: &str) -> String {
        let mut msg = format!("unknown scenario `{name}`. Available:");
        for scenario in Scenario::ALL {
            msg.push_str("\n  ");
            msg.push_str(scenario.name());
        }
        msg
    }

    /// Prints the outcome and returns whether it matched the expectation.
    fn run_scenario(scenario: Scenario) -> Result<bool, String> {
        let case = scenario.case();
        let mut probe = ContainmentProbe::new(case.mesh, case.options)
            .map_err(|e| format!("{}: {e}", scenario.name()))?;
        let actual = probe.query(&case.transform, case.point);
        let ok = actual == case.expected;

        println!(
            "{:<32} point {} -> {:?} (expected {:?}) {}",
            scenario.name(),
            case.point,
            actual,
            case.expected,
            if ok { "ok" } else { "FAILED" }
        );
        Ok(ok)
    }

    fn cmd_query(args: &mut Args) -> Result<(), String> {
        let shape = args.next().ok_or("missing shape")?;
        let mesh = shape_mesh(&shape)?;
        let point = args.vec3("point")?;

        let mut transform = Transform::IDENTITY;
        let mut options = ContainmentOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--position" => transform.position = args.vec3("--position")?,
                "--euler" => {
                    let e = args.vec3("--euler")?;
                    transform.rotation = Quat::euler(e.x, e.y, e.z);
                }
                "--scale" => transform = transform.with_uniform_scale(args.f64("--scale")?),
                "--reference" => {
                    options.reference = match args.value("--reference")?.as_str() {
                        "centroid" => ReferencePoint::Centroid,
                        "origin" => ReferencePoint::TransformOrigin,
                        other => {
                            return Err(format!(
                                "unknown reference `{other}` (expected centroid or origin)"
                            ));
                        }
                    }
                }
                "--no-bounds" => options.bounds_prefilter = false,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let mut probe = ContainmentProbe::new(mesh, options).map_err(|e| e.to_string())?;
        let result = probe.query(&transform, point);
        let hull = probe.prepare(&transform);

        println!("shape:      {shape}");
        println!("point:      {point}");
        println!(
            "bounds:     center {} size {}",
            hull.bounds().center,
            hull.bounds().size
        );
        println!("planes:     {}", hull.planes().len());
        if hull.degenerate_face_count() > 0 {
            println!("degenerate: {}", hull.degenerate_face_count());
        }
        if !hull.is_convex(hull_probe::geom::Tolerance::LOOSE) {
            println!("warning:    mesh is not convex, enclosed concave regions read as outside");
        }
        println!("result:     {result:?}");
        Ok(())
    }

    fn shape_mesh(name: &str) -> Result<TriMesh, String> {
        match name {
            "cube" => Ok(TriMesh::unit_cube()),
            "tetrahedron" => Ok(TriMesh::tetrahedron()),
            "l_prism" => Ok(TriMesh::l_prism()),
            other => Err(format!(
                "unknown shape `{other}` (expected cube, tetrahedron or l_prism)"
            )),
        }
    }

    fn cmd_exercise(args: &mut Args) -> Result<(), String> {
        let n = args.value("exercise number")?;
        let n: usize = n
            .parse()
            .map_err(|_| format!("invalid exercise number `{n}`"))?;
        let exercise = VectorExercise::from_number(n).ok_or_else(|| {
            let mut msg = format!("no exercise {n}. Available:");
            for e in VectorExercise::ALL {
                msg.push_str(&format!("\n  {e}"));
            }
            msg
        })?;

        let a = args.vec3("a")?;
        let b = args.vec3("b")?;
        let t = match args.next() {
            Some(raw) => parse_f64("t", &raw)?,
            None => 0.0,
        };

        let result = exercise.evaluate(a, b, t);
        if exercise.is_animated() {
            println!("{exercise} a={a} b={b} t={t} -> {result}");
        } else {
            println!("{exercise} a={a} b={b} -> {result}");
        }
        Ok(())
    }

    fn parse_f64(what: &str, raw: &str) -> Result<f64, String> {
        raw.parse()
            .map_err(|_| format!("invalid number `{raw}` for {what}"))
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Scenario {
        CubeCenter,
        CubeFar,
        CubeNearCorner,
        CubeJustOutsideFace,
        ScaledCube,
        RotatedCube,
        LPrismNotch,
        LPrismEnclosedConcave,
        TetrahedronCorner,
        OffsetCubeOriginReference,
    }

    struct ScenarioCase {
        mesh: TriMesh,
        transform: Transform,
        options: ContainmentOptions,
        point: Vec3,
        expected: PointContainment,
    }

    impl Scenario {
        const ALL: &'static [Scenario] = &[
            Scenario::CubeCenter,
            Scenario::CubeFar,
            Scenario::CubeNearCorner,
            Scenario::CubeJustOutsideFace,
            Scenario::ScaledCube,
            Scenario::RotatedCube,
            Scenario::LPrismNotch,
            Scenario::LPrismEnclosedConcave,
            Scenario::TetrahedronCorner,
            Scenario::OffsetCubeOriginReference,
        ];

        fn name(self) -> &'static str {
            match self {
                Scenario::CubeCenter => "cube_center",
                Scenario::CubeFar => "cube_far",
                Scenario::CubeNearCorner => "cube_near_corner",
                Scenario::CubeJustOutsideFace => "cube_just_outside_face",
                Scenario::ScaledCube => "scaled_cube",
                Scenario::RotatedCube => "rotated_cube",
                Scenario::LPrismNotch => "l_prism_notch",
                Scenario::LPrismEnclosedConcave => "l_prism_enclosed_concave",
                Scenario::TetrahedronCorner => "tetrahedron_corner",
                Scenario::OffsetCubeOriginReference => "offset_cube_origin_reference",
            }
        }

        fn from_str(name: &str) -> Option<Self> {
            Self::ALL.iter().copied().find(|s| s.name() == name)
        }

        fn description(self) -> &'static str {
            match self {
                Scenario::CubeCenter => "unit cube, origin is inside",
                Scenario::CubeFar => "unit cube, (10,0,0) fails the bounds test",
                Scenario::CubeNearCorner => "unit cube, (0.49,0.49,0.49) is inside",
                Scenario::CubeJustOutsideFace => "unit cube, (0.51,0,0) is outside",
                Scenario::ScaledCube => "cube scaled by 2, (0.9,0,0) is inside",
                Scenario::RotatedCube => "cube turned 45° about Z at (5,0,0)",
                Scenario::LPrismNotch => "L prism, notch point passes bounds but is outside",
                Scenario::LPrismEnclosedConcave => "L prism, enclosed point past the inner face",
                Scenario::TetrahedronCorner => "tetrahedron, empty corner of its bounds",
                Scenario::OffsetCubeOriginReference => {
                    "cube away from its local origin, origin reference"
                }
            }
        }

        fn case(self) -> ScenarioCase {
            let cube = |point: Vec3, expected| ScenarioCase {
                mesh: TriMesh::unit_cube(),
                transform: Transform::IDENTITY,
                options: ContainmentOptions::default(),
                point,
                expected,
            };

            match self {
                Scenario::CubeCenter => cube(Vec3::ZERO, PointContainment::Inside),
                Scenario::CubeFar => {
                    cube(Vec3::new(10.0, 0.0, 0.0), PointContainment::OutsideBounds)
                }
                Scenario::CubeNearCorner => {
                    cube(Vec3::new(0.49, 0.49, 0.49), PointContainment::Inside)
                }
                Scenario::CubeJustOutsideFace => {
                    cube(Vec3::new(0.51, 0.0, 0.0), PointContainment::Outside)
                }
                Scenario::ScaledCube => ScenarioCase {
                    transform: Transform::IDENTITY.with_uniform_scale(2.0),
                    ..cube(Vec3::new(0.9, 0.0, 0.0), PointContainment::Inside)
                },
                Scenario::RotatedCube => ScenarioCase {
                    transform: Transform::from_position(Vec3::new(5.0, 0.0, 0.0))
                        .with_rotation(Quat::euler(0.0, 0.0, 45.0)),
                    ..cube(Vec3::new(5.6, 0.0, 0.0), PointContainment::Inside)
                },
                Scenario::LPrismNotch => ScenarioCase {
                    mesh: TriMesh::l_prism(),
                    ..cube(Vec3::new(1.5, 1.5, 0.5), PointContainment::Outside)
                },
                Scenario::LPrismEnclosedConcave => ScenarioCase {
                    mesh: TriMesh::l_prism(),
                    ..cube(Vec3::new(1.5, 0.5, 0.5), PointContainment::Outside)
                },
                Scenario::TetrahedronCorner => ScenarioCase {
                    mesh: TriMesh::tetrahedron(),
                    ..cube(Vec3::new(0.9, -0.9, 0.9), PointContainment::Outside)
                },
                Scenario::OffsetCubeOriginReference => {
                    let mut mesh = TriMesh::unit_cube();
                    for p in &mut mesh.positions {
                        for c in p.iter_mut() {
                            *c += 2.5;
                        }
                    }
                    ScenarioCase {
                        mesh,
                        options: ContainmentOptions {
                            reference: ReferencePoint::TransformOrigin,
                            ..ContainmentOptions::default()
                        },
                        // The true interior reads as outside in this mode.
                        ..cube(Vec3::new(2.5, 2.5, 2.5), PointContainment::Outside)
                    }
                }
            }
        }
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }

        fn f64(&mut self, flag: &str) -> Result<f64, String> {
            let raw = self.value(flag)?;
            parse_f64(flag, &raw)
        }

        fn vec3(&mut self, flag: &str) -> Result<Vec3, String> {
            Ok(Vec3::new(self.f64(flag)?, self.f64(flag)?, self.f64(flag)?))
        }
    }
}
