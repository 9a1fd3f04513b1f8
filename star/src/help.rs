pub const USAGE: &str = "\
Usage: star [OPTION...] [FILE...]

Examples:
\tstar -cvf html-paq.tar index.html
\tstar -xvf xxx.tar
\tstar -cvf foo.tar doc1.txt doc2.txt data.dat
\tstar --delete -vf foo.tar data.dat
\tstar -rvf foo.tar test.doc

Main operation mode:
\t-h, --help: display this help menu
\t-c, --create: create a new archive
\t-x, --extract: extract from an archive
\t-t, --list: list the contents of an archive
\t--delete: delete from an archive
\t-u, --update: update the contents of an archive
\t-v, --verbose: display a verbose progress report
\t-f, --file: archive contents from/to a file
\t-r, --append: append contents to an archive
\t-p, --pack: pack the contents of an archive (not present in tar)
";
