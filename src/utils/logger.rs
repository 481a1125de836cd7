use crate::utils::spinner::Spinner;
use std::io;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("attachment_etl=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("attachment_etl=info"))
    }
}

/// 每行日誌寫出前先收起 spinner，寫完再重畫
#[derive(Clone)]
pub struct SpinnerWriter<M> {
    spinner: Spinner,
    inner: M,
}

impl<M> SpinnerWriter<M> {
    pub fn new(spinner: Spinner, inner: M) -> Self {
        Self { spinner, inner }
    }
}

impl<'a, M: MakeWriter<'a>> MakeWriter<'a> for SpinnerWriter<M> {
    type Writer = SuspendedWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendedWriter {
            spinner: self.spinner.clone(),
            inner: self.inner.make_writer(),
        }
    }
}

pub struct SuspendedWriter<W> {
    spinner: Spinner,
    inner: W,
}

impl<W: io::Write> io::Write for SuspendedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let inner = &mut self.inner;
        self.spinner.suspend(|| inner.write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let inner = &mut self.inner;
        self.spinner.suspend(|| inner.write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// 日誌一律寫到 stderr，stdout 保留給最終結果
pub fn init_cli_logger(verbose: bool, spinner: &Spinner) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(SpinnerWriter::new(spinner.clone(), io::stderr))
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(verbose: bool, spinner: &Spinner) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(SpinnerWriter::new(spinner.clone(), io::stderr))
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}
