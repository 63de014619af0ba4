use super::parameters::ScoringParameters;
use crate::models::{ResidueRecord, SequenceModel};
use log::debug;

/// Log-scale thresholds on observed peptides per theoretical fragment
/// (percent); entry `i` is `2^(15 i / 99)`.
pub const BIN_MAP: [f64; 100] = [
    1.0, 1.11073537957, 1.23373308343, 1.37035098472, 1.52209732116,
    1.69064734577, 1.87786182132, 2.08580756289, 2.31678025509, 2.57332979602,
    2.85828844775, 3.17480210394, 3.52636501998, 3.91685838898, 4.35059318942,
    4.83235777762, 5.36747075035, 5.96183966124, 6.62202623908, 7.3553188282,
    8.16981285052, 9.07450017756, 10.0793683992, 11.1955110847, 12.4352502542,
    13.8122724111, 15.3417796394, 17.040657431, 18.9276610998, 21.0236228361,
    23.3516816909, 25.9375390266, 28.8097422559, 32.0, 35.5435321463,
    39.4794586699, 43.851231511, 48.7071142772, 54.1007150645, 60.0915782823,
    66.7458420126, 74.1369681627, 82.3465534726, 91.4652303279, 101.593667326,
    112.843680639, 125.339468447, 139.218982061, 154.635448884, 171.759064011,
    190.77886916, 211.904839651, 235.370202503, 261.434011217, 290.384005682,
    322.539788773, 358.25635471, 397.928008133, 441.992717157, 490.936948459,
    545.301037793, 605.685155195, 672.755930757, 747.253814109, 830.001248851,
    921.911752189, 1024.0, 1137.39302868, 1263.34267744, 1403.23940835,
    1558.62765687, 1731.22288206, 1922.93050504, 2135.8669444, 2372.38298121,
    2635.08971112, 2926.88737049, 3250.99735443, 3610.99778046, 4010.86299032,
    4455.00742597, 4948.33436428, 5496.29004836, 6104.92381311, 6780.95486882,
    7531.84648008, 8365.88835894, 9292.28818183, 10321.2732407, 11464.2033507,
    12733.6962603, 14143.766949, 15709.9823507, 17449.6332094, 19381.9249662,
    21528.1897842, 23912.1220515, 26560.0399632, 29501.17607, 32768.0,
];

/// Smallest bin whose threshold is not below `density`, saturating at 99.
pub fn abundance_bin(density: f64) -> u8 {
    let mut bin = 0;
    while bin < BIN_MAP.len() - 1 && BIN_MAP[bin] < density {
        bin += 1;
    }
    bin as u8
}

/// Number of residues consumed from the front of `residues` until their
/// coverage reaches `threshold`.
fn residues_to_reach<'a>(
    residues: impl Iterator<Item = &'a ResidueRecord>,
    threshold: f64,
) -> Option<usize> {
    let mut covered = 0.0;
    let mut consumed = 0;
    for residue in residues {
        if covered >= threshold {
            return Some(consumed);
        }
        covered += residue.gator_coverage;
        consumed += 1;
    }
    (covered >= threshold).then_some(consumed)
}

/// Boundaries of N- and C-terminal processing zones inferred from where the
/// first and last few percent of coverage sit.
///
/// Returns the last index of the N-terminal zone and the first index of the
/// C-terminal zone.
pub fn detect_terminal_zones(
    model: &SequenceModel,
    params: &ScoringParameters,
) -> (Option<usize>, Option<usize>) {
    let len = model.len();
    let threshold = model.total_gator_coverage() * params.terminal_coverage_fraction;
    let min_length = (len as f64 * params.terminal_min_fraction).floor();
    let max_length = params.terminal_length(len);
    let is_zone = |consumed: &usize| {
        let consumed = *consumed as f64;
        consumed > min_length && consumed < max_length
    };

    let n_terminal = residues_to_reach(model.residues.iter(), threshold)
        .filter(is_zone)
        .map(|k| k - 1);
    let c_terminal = residues_to_reach(model.residues.iter().rev(), threshold)
        .filter(is_zone)
        .map(|k| len - k);
    (n_terminal, c_terminal)
}

/// Recomputes `abundance_score` and the terminal zones from the current
/// coverage. Zones from earlier passes are cleared first.
pub fn estimate_abundance(model: &mut SequenceModel, params: &ScoringParameters) {
    let density = (model.peptide_total / model.tryptic_total as f64) * 100.0;
    model.abundance_score = abundance_bin(density);

    let (n_terminal, c_terminal) = if model.abundance_score >= params.terminal_min_abundance {
        detect_terminal_zones(model, params)
    } else {
        (None, None)
    };
    model.n_terminal = n_terminal;
    model.c_terminal = c_terminal;
    debug!(
        "Abundance {} (density {:.3}), terminal zones {:?}/{:?}",
        model.abundance_score, density, n_terminal, c_terminal
    );
}
