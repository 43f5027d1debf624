/// Header XFOIL writes before the data rows of a saved polar.
pub const POLAR_HEADER: &str = "
       XFOIL         Version 6.99

 Calculated polar for: S1223

 1 1 Reynolds number fixed          Mach number fixed

 xtrf =   1.000 (top)        1.000 (bottom)
 Mach =   0.000     Re =     0.400 e 6     Ncrit =   9.000

  alpha    CL        CD       CDp       CM     Top_Xtr  Bot_Xtr
 ------ -------- --------- --------- -------- -------- --------
";

/// A saved polar with rows `(alpha, CL, CD, CDp, CM)`.
pub fn polar_text(rows: &[(f64, f64, f64, f64, f64)]) -> String {
    let mut text = POLAR_HEADER.to_string();
    for (alpha, cl, cd, cdp, cm) in rows {
        text.push_str(&format!(
            "  {alpha:>6.3}  {cl:>7.4}  {cd:>8.5}  {cdp:>8.5}  {cm:>7.4}  {:>7.4}  {:>7.4}\n",
            0.5, 1.0
        ));
    }
    text
}

/// A well-behaved section polar from -4° to 12° in 2° steps, CL = 0.4 + 0.1 α.
pub fn section_polar_rows() -> Vec<(f64, f64, f64, f64, f64)> {
    (-2..=6)
        .map(|i| {
            let alpha = 2.0 * i as f64;
            let cl = 0.4 + 0.1 * alpha;
            (alpha, cl, 0.01 + 0.002 * alpha.abs(), 0.005, -0.1)
        })
        .collect()
}

/// Total-forces dump with `@ALPHA@` and `@CL@` placeholders.
pub const TOTAL_FORCES_TEMPLATE: &str = "
 ---------------------------------------------------------------
 Vortex Lattice Output -- Total Forces

 Configuration: Plane
     # Surfaces =   1
     # Strips   =  20
     # Vortices = 240

  Sref =  1.1700       Cref = 0.46700       Bref =  2.6000
  Xref = 0.11700       Yref =  0.0000       Zref =  0.0000

 Standard axis orientation,  X fwd, Z down

 Run case:  -unnamed-

  Alpha = @ALPHA@     pb/2V =  -0.00000     p'b/2V =  -0.00000
  Beta  =   0.00000     qc/2V =   0.00000
  Mach  =     0.000     rb/2V =  -0.00000     r'b/2V =  -0.00000

  CXtot =   0.01544     Cltot =  -0.00000     Cl'tot =  -0.00000
  CYtot =   0.00000     Cmtot =  -0.21784
  CZtot =  -1.41125     Cntot =   0.00000     Cn'tot =   0.00000

  CLtot = @CL@
  CDtot =   0.08303
  CDvis =   0.02187     CDind = 0.0611622
  CLff  =   1.40377     CDff  = 0.0606049    | Trefftz
  CYff  =   0.00000         e =    0.9587    | Plane
 ---------------------------------------------------------------
";

/// Strip forces of a single surface, rows out of spanwise order.
pub const STRIP_FORCES: &str = "
 ---------------------------------------------------------------
 Surface and Strip Forces by surface

  Sref =  1.1700       Cref = 0.46700       Bref =  2.6000

  Surface # 1     Wing
     # Chordwise =12   # Spanwise =20     First strip =  1
     Surface area Ssurf =    0.585000     Ave. chord Cave =    0.450000

 Strip Forces referred to Strip Area, Chord
    j      Yle    Chord     Area     c cl      ai      cl_norm  cl       cd       cdv    cm_c/4    cm_LE  C.P.x/c
     1   0.0325   0.5925   0.0385   0.8400  -0.0100   0.8400   1.4177   0.0200   0.0140  -0.1000  -0.4550   0.320
     3   1.2675   0.3075   0.0200   0.3600  -0.0600   0.3600   1.1707   0.0240   0.0170  -0.1200  -0.4150   0.352
     2   0.6500   0.4500   0.0293   0.6300  -0.0300   0.6300   1.4000   0.0210   0.0150  -0.1100  -0.4600   0.329
 ---------------------------------------------------------------
";
