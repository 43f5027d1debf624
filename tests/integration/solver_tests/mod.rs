#[cfg(unix)]
mod xfoil;
